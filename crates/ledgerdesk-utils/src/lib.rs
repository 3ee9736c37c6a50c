//! Utility functions and helpers

pub mod sequence;

use rust_decimal::{Decimal, RoundingStrategy};

pub use sequence::{SecretSequence, SequenceError, Unlocked};

/// Format an amount with a fixed number of decimal places
///
/// Midpoints round away from zero, so `2.345` at two places is `2.35`.
pub fn format_amount(amount: Decimal, places: u32) -> String {
    let rounded = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", places as usize, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_amount_pads() {
        assert_eq!(format_amount(dec!(60), 2), "60.00");
        assert_eq!(format_amount(dec!(-40.5), 2), "-40.50");
        assert_eq!(format_amount(Decimal::ZERO, 2), "0.00");
    }

    #[test]
    fn test_format_amount_rounds_midpoint_away_from_zero() {
        assert_eq!(format_amount(dec!(2.345), 2), "2.35");
        assert_eq!(format_amount(dec!(-2.345), 2), "-2.35");
        assert_eq!(format_amount(dec!(2.5), 0), "3");
    }
}
