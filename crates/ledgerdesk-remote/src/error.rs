//! Error types for ledgerdesk-remote

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// The request never produced a response (connect, DNS, TLS, body read)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Non-2xx response; `body` is the response text, verbatim
    #[error("Server rejected request ({status}): {body}")]
    ServerRejected { status: u16, body: String },

    /// 2xx response whose body is not the expected JSON
    #[error("Unexpected response body: {message}")]
    Decode { message: String },
}

impl RemoteError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::ServerRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            RemoteError::Decode { message: error.to_string() }
        } else {
            RemoteError::Network { message: error.to_string() }
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;
