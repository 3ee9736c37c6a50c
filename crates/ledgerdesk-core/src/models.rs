//! Cached views and input drafts

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ledgerdesk_remote::{
    Counterparty, CounterpartyFields, CounterpartyId, Transaction, TransactionFields, TransactionId,
    TransactionType,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Transaction as held in the cache, joined with its counterparty's name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: TransactionId,
    pub counterparty_id: CounterpartyId,
    /// Empty when the counterparty is not cached
    pub counterparty_name: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub date: NaiveDateTime,
    pub description: String,
}

impl TransactionView {
    /// Join a wire transaction against the cached counterparties
    pub fn join(transaction: Transaction, counterparties: &[Counterparty]) -> Self {
        let counterparty_name = name_of(counterparties, transaction.counterparty_id);
        Self {
            id: transaction.id,
            counterparty_id: transaction.counterparty_id,
            counterparty_name,
            amount: transaction.amount,
            transaction_type: transaction.transaction_type,
            date: transaction.date,
            description: transaction.description,
        }
    }

    /// Overwrite the editable fields and recompute the joined name
    pub fn apply(&mut self, fields: &TransactionFields, counterparties: &[Counterparty]) {
        self.counterparty_id = fields.counterparty_id;
        self.counterparty_name = name_of(counterparties, fields.counterparty_id);
        self.amount = fields.amount;
        self.transaction_type = fields.transaction_type.clone();
        self.date = fields.date;
        self.description = fields.description.clone();
    }

    /// Calendar date used by every date comparison
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    pub fn is_credit(&self) -> bool {
        self.transaction_type == TransactionType::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.transaction_type == TransactionType::Debit
    }
}

pub(crate) fn name_of(counterparties: &[Counterparty], id: CounterpartyId) -> String {
    counterparties
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.clone())
        .unwrap_or_default()
}

/// Raw counterparty input as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterpartyDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl CounterpartyDraft {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = phone.to_string();
        self
    }

    /// Trim every field and require a name
    pub fn validate(&self) -> CoreResult<CounterpartyFields> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("name", "Counterparty name is required"));
        }
        Ok(CounterpartyFields {
            name: name.to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
        })
    }
}

/// Raw transaction input as typed by the user
///
/// Unselected choices are `None`; the amount stays text until validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub counterparty_id: Option<CounterpartyId>,
    pub transaction_type: Option<String>,
    pub amount: String,
    pub date: Option<NaiveDate>,
    pub description: String,
}

impl TransactionDraft {
    /// Check the draft and produce the request body
    ///
    /// A missing date becomes `today`. Counterparty existence is checked by
    /// the ledger against its cache, not here.
    pub fn validate(&self, today: NaiveDate) -> CoreResult<TransactionFields> {
        let counterparty_id = self
            .counterparty_id
            .ok_or_else(|| CoreError::validation("counterparty", "Please select a counterparty"))?;

        let transaction_type = self
            .transaction_type
            .as_deref()
            .map(|raw| TransactionType::parse(raw.trim()))
            .filter(TransactionType::is_known)
            .ok_or_else(|| CoreError::validation("type", "Please select Credit or Debit"))?;

        let amount = parse_amount(&self.amount)
            .ok_or_else(|| CoreError::validation("amount", "Please enter a valid amount"))?;

        let date = self.date.unwrap_or(today).and_time(NaiveTime::MIN);

        Ok(TransactionFields {
            counterparty_id,
            amount,
            transaction_type,
            date,
            description: self.description.trim().to_string(),
        })
    }
}

/// Decimal text, plain or scientific, with surrounding blanks ignored
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn acme() -> Vec<Counterparty> {
        vec![Counterparty {
            id: 1,
            name: "Acme".to_string(),
            address: String::new(),
            phone: String::new(),
        }]
    }

    fn draft() -> TransactionDraft {
        TransactionDraft {
            counterparty_id: Some(1),
            transaction_type: Some("Credit".to_string()),
            amount: "100".to_string(),
            date: Some(day(2024, 1, 5)),
            description: " invoice 7 ".to_string(),
        }
    }

    #[test]
    fn test_counterparty_draft_trims() {
        let fields = CounterpartyDraft::new("  Acme  ")
            .with_address(" 1 Road ")
            .with_phone("555 ")
            .validate()
            .unwrap();
        assert_eq!(fields.name, "Acme");
        assert_eq!(fields.address, "1 Road");
        assert_eq!(fields.phone, "555");
    }

    #[test]
    fn test_counterparty_draft_blank_name() {
        let err = CounterpartyDraft::new("   ").validate().unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_transaction_draft_valid() {
        let fields = draft().validate(day(2030, 1, 1)).unwrap();
        assert_eq!(fields.counterparty_id, 1);
        assert_eq!(fields.amount, dec!(100));
        assert_eq!(fields.transaction_type, TransactionType::Credit);
        assert_eq!(fields.date.date(), day(2024, 1, 5));
        assert_eq!(fields.description, "invoice 7");
    }

    #[test]
    fn test_transaction_draft_date_defaults_to_today() {
        let mut d = draft();
        d.date = None;
        let fields = d.validate(day(2024, 3, 9)).unwrap();
        assert_eq!(fields.date, day(2024, 3, 9).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_transaction_draft_rejections() {
        let today = day(2024, 1, 1);

        let mut d = draft();
        d.counterparty_id = None;
        assert!(matches!(d.validate(today), Err(CoreError::ValidationFailed { ref field, .. }) if field == "counterparty"));

        let mut d = draft();
        d.transaction_type = None;
        assert!(matches!(d.validate(today), Err(CoreError::ValidationFailed { ref field, .. }) if field == "type"));

        let mut d = draft();
        d.transaction_type = Some("Refund".to_string());
        assert!(matches!(d.validate(today), Err(CoreError::ValidationFailed { ref field, .. }) if field == "type"));

        for bad in ["", "abc", "12,5x"] {
            let mut d = draft();
            d.amount = bad.to_string();
            assert!(matches!(d.validate(today), Err(CoreError::ValidationFailed { ref field, .. }) if field == "amount"));
        }
    }

    #[test]
    fn test_transaction_draft_type_case() {
        let mut d = draft();
        d.transaction_type = Some("debit".to_string());
        assert_eq!(d.validate(day(2024, 1, 1)).unwrap().transaction_type, TransactionType::Debit);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 40.50 "), Some(dec!(40.50)));
        assert_eq!(parse_amount("-3"), Some(dec!(-3)));
        assert_eq!(parse_amount("1e2"), Some(dec!(100)));
        assert_eq!(parse_amount("forty"), None);
    }

    #[test]
    fn test_view_join_and_apply() {
        let tx = Transaction {
            id: 10,
            counterparty_id: 1,
            amount: dec!(100),
            transaction_type: TransactionType::Credit,
            date: day(2024, 1, 5).and_hms_opt(9, 30, 0).unwrap(),
            description: String::new(),
        };
        let mut view = TransactionView::join(tx, &acme());
        assert_eq!(view.counterparty_name, "Acme");
        assert_eq!(view.day(), day(2024, 1, 5));
        assert!(view.is_credit());

        let mut fields = draft().validate(day(2024, 1, 1)).unwrap();
        fields.counterparty_id = 99;
        view.apply(&fields, &acme());
        assert_eq!(view.counterparty_id, 99);
        assert_eq!(view.counterparty_name, "");
    }
}
