//! Ledger filter: counterparty and inclusive date bounds

use chrono::NaiveDate;
use ledgerdesk_remote::CounterpartyId;
use serde::{Deserialize, Serialize};

use crate::models::TransactionView;

/// Filter over cached transactions
///
/// Every criterion is optional; an empty filter matches everything. Dates
/// compare by calendar day only, so a transaction stamped late in the
/// evening of `to` still matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFilter {
    pub counterparty_id: Option<CounterpartyId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl LedgerFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Exactly one calendar day
    pub fn on(date: NaiveDate) -> Self {
        Self {
            counterparty_id: None,
            from: Some(date),
            to: Some(date),
        }
    }

    pub fn counterparty(mut self, id: CounterpartyId) -> Self {
        self.counterparty_id = Some(id);
        self
    }

    pub fn from(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self
    }

    pub fn to(mut self, date: NaiveDate) -> Self {
        self.to = Some(date);
        self
    }

    /// Check if a date is within the bounds
    pub fn contains(&self, date: &NaiveDate) -> bool {
        match (self.from, self.to) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    pub fn matches(&self, transaction: &TransactionView) -> bool {
        if let Some(id) = self.counterparty_id {
            if transaction.counterparty_id != id {
                return false;
            }
        }
        self.contains(&transaction.day())
    }

    /// Human-readable description of the date bounds
    pub fn description(&self) -> String {
        match (self.from, self.to) {
            (None, None) => "All Time".to_string(),
            (Some(s), None) => format!("From {}", s),
            (None, Some(e)) => format!("Until {}", e),
            (Some(s), Some(e)) if s == e => s.to_string(),
            (Some(s), Some(e)) => format!("{} to {}", s, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_remote::TransactionType;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn view(counterparty_id: CounterpartyId, date: NaiveDate, hour: u32) -> TransactionView {
        TransactionView {
            id: 1,
            counterparty_id,
            counterparty_name: String::new(),
            amount: dec!(1),
            transaction_type: TransactionType::Credit,
            date: date.and_hms_opt(hour, 0, 0).unwrap(),
            description: String::new(),
        }
    }

    #[test]
    fn test_filter_all() {
        let filter = LedgerFilter::all();
        assert!(filter.matches(&view(1, day(1999, 1, 1), 0)));
        assert!(filter.matches(&view(7, day(2100, 12, 31), 23)));
        assert_eq!(filter.description(), "All Time");
    }

    #[test]
    fn test_filter_contains() {
        let filter = LedgerFilter::all().from(day(2024, 1, 1)).to(day(2024, 12, 31));
        assert!(filter.contains(&day(2024, 6, 15)));
        assert!(filter.contains(&day(2024, 1, 1)));
        assert!(filter.contains(&day(2024, 12, 31)));
        assert!(!filter.contains(&day(2023, 12, 31)));
        assert!(!filter.contains(&day(2025, 1, 1)));
    }

    #[test]
    fn test_filter_open_bounds() {
        let from = LedgerFilter::all().from(day(2024, 1, 6));
        assert!(!from.contains(&day(2024, 1, 5)));
        assert!(from.contains(&day(2030, 1, 1)));

        let to = LedgerFilter::all().to(day(2024, 1, 5));
        assert!(to.contains(&day(2000, 1, 1)));
        assert!(!to.contains(&day(2024, 1, 6)));
    }

    #[test]
    fn test_filter_ignores_time_of_day() {
        let filter = LedgerFilter::on(day(2024, 1, 5));
        assert!(filter.matches(&view(1, day(2024, 1, 5), 0)));
        assert!(filter.matches(&view(1, day(2024, 1, 5), 23)));
        assert!(!filter.matches(&view(1, day(2024, 1, 6), 0)));
    }

    #[test]
    fn test_filter_counterparty() {
        let filter = LedgerFilter::all().counterparty(2);
        assert!(filter.matches(&view(2, day(2024, 1, 5), 0)));
        assert!(!filter.matches(&view(1, day(2024, 1, 5), 0)));
    }

    #[test]
    fn test_filter_inverted_bounds_match_nothing() {
        let filter = LedgerFilter::all().from(day(2024, 2, 1)).to(day(2024, 1, 1));
        assert!(!filter.contains(&day(2024, 1, 15)));
    }

    #[test]
    fn test_filter_description() {
        assert_eq!(LedgerFilter::on(day(2024, 1, 5)).description(), "2024-01-05");
        let range = LedgerFilter::all().from(day(2024, 1, 1)).to(day(2024, 1, 31));
        assert_eq!(range.description(), "2024-01-01 to 2024-01-31");
        assert_eq!(LedgerFilter::all().from(day(2024, 1, 1)).description(), "From 2024-01-01");
    }
}
