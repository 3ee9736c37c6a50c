//! Aggregates derived from the cache

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::TransactionView;

/// Credit, debit and balance over a set of transactions
///
/// Entries whose type is neither Credit nor Debit count toward nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_credit: Decimal,
    pub total_debit: Decimal,
    pub balance: Decimal,
}

impl Totals {
    pub fn aggregate<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a TransactionView>,
    {
        let mut total_credit = Decimal::ZERO;
        let mut total_debit = Decimal::ZERO;
        for tx in transactions {
            if tx.is_credit() {
                total_credit += tx.amount;
            } else if tx.is_debit() {
                total_debit += tx.amount;
            }
        }
        Self {
            total_credit,
            total_debit,
            balance: total_credit - total_debit,
        }
    }
}

/// Dashboard figures over the whole cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub counterparty_count: usize,
    pub transaction_count: usize,
    #[serde(flatten)]
    pub totals: Totals,
}

/// Filtered ledger with its totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerReport {
    pub period: String,
    pub transactions: Vec<TransactionView>,
    #[serde(flatten)]
    pub totals: Totals,
}

/// Transactions of a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRegister {
    pub date: NaiveDate,
    pub transactions: Vec<TransactionView>,
    pub total_credit: Decimal,
    pub total_debit: Decimal,
}

impl DailyRegister {
    pub fn new(date: NaiveDate, transactions: Vec<TransactionView>) -> Self {
        let totals = Totals::aggregate(&transactions);
        Self {
            date,
            transactions,
            total_credit: totals.total_credit,
            total_debit: totals.total_debit,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.total_credit - self.total_debit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_remote::TransactionType;
    use rust_decimal_macros::dec;

    fn view(id: i64, amount: Decimal, kind: &str) -> TransactionView {
        TransactionView {
            id,
            counterparty_id: 1,
            counterparty_name: "Acme".to_string(),
            amount,
            transaction_type: TransactionType::parse(kind),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            description: String::new(),
        }
    }

    #[test]
    fn test_aggregate_empty() {
        let totals = Totals::aggregate(&Vec::<TransactionView>::new());
        assert_eq!(totals, Totals::default());
        assert_eq!(totals.balance, Decimal::ZERO);
    }

    #[test]
    fn test_aggregate_credit_and_debit() {
        let txs = vec![view(10, dec!(100.00), "Credit"), view(11, dec!(40.00), "Debit")];
        let totals = Totals::aggregate(&txs);
        assert_eq!(totals.total_credit, dec!(100.00));
        assert_eq!(totals.total_debit, dec!(40.00));
        assert_eq!(totals.balance, dec!(60.00));
    }

    #[test]
    fn test_aggregate_type_case_insensitive() {
        let txs = vec![
            view(1, dec!(1), "credit"),
            view(2, dec!(1), "Credit"),
            view(3, dec!(1), "CREDIT"),
        ];
        assert_eq!(Totals::aggregate(&txs).total_credit, dec!(3));
    }

    #[test]
    fn test_aggregate_skips_unknown_types() {
        let txs = vec![view(1, dec!(5), "Credit"), view(2, dec!(500), "Refund")];
        let totals = Totals::aggregate(&txs);
        assert_eq!(totals.total_credit, dec!(5));
        assert_eq!(totals.total_debit, Decimal::ZERO);
    }

    #[test]
    fn test_aggregate_exact_decimal() {
        let txs: Vec<_> = (0..1000).map(|i| view(i, dec!(0.10), "Credit")).collect();
        let mut all = txs.clone();
        all.push(view(5000, dec!(33.33), "Debit"));
        let totals = Totals::aggregate(&all);
        assert_eq!(totals.total_credit, dec!(100.00));
        assert_eq!(totals.balance, totals.total_credit - totals.total_debit);
        assert_eq!(totals.balance, dec!(66.67));
    }

    #[test]
    fn test_daily_register() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let register = DailyRegister::new(date, vec![view(1, dec!(7), "Debit")]);
        assert_eq!(register.total_credit, Decimal::ZERO);
        assert_eq!(register.total_debit, dec!(7));
        assert_eq!(register.balance(), dec!(-7));
    }

    #[test]
    fn test_summary_serializes_flat() {
        let summary = LedgerSummary {
            counterparty_count: 1,
            transaction_count: 2,
            totals: Totals::aggregate(&[view(1, dec!(2), "Credit")]),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["counterparty_count"], 1);
        assert!(value.get("total_credit").is_some());
    }
}
