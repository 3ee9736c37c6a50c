//! Rolling-window detector for a secret key sequence
//!
//! Keeps the last N characters typed, where N is the length of the target
//! in characters, and reports a match the moment the window equals the
//! target exactly. Comparison is literal: no case folding, no partial
//! matches, operator glyphs such as `÷` or `±` count as one character.

use std::collections::VecDeque;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Secret sequence must not be empty")]
    EmptyTarget,
}

/// Emitted once per completed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unlocked;

#[derive(Debug, Clone)]
pub struct SecretSequence {
    target: Vec<char>,
    window: VecDeque<char>,
}

impl SecretSequence {
    pub fn new(target: &str) -> Result<Self, SequenceError> {
        let target: Vec<char> = target.chars().collect();
        if target.is_empty() {
            return Err(SequenceError::EmptyTarget);
        }
        Ok(Self {
            window: VecDeque::with_capacity(target.len()),
            target,
        })
    }

    /// Record one key; the window is cleared after a match
    pub fn push(&mut self, key: char) -> Option<Unlocked> {
        self.window.push_back(key);
        while self.window.len() > self.target.len() {
            self.window.pop_front();
        }

        if self.window.iter().eq(self.target.iter()) {
            self.window.clear();
            Some(Unlocked)
        } else {
            None
        }
    }

    /// Record every character of a button label in order; counts matches
    pub fn push_str(&mut self, keys: &str) -> usize {
        keys.chars().filter_map(|key| self.push(key)).count()
    }

    /// Characters currently held, oldest first
    pub fn buffer(&self) -> String {
        self.window.iter().collect()
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }
}
