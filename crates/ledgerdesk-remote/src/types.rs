//! Wire types exchanged with the bookkeeping service

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub type CounterpartyId = i64;
pub type TransactionId = i64;
pub type AccountId = i64;

/// A server-owned resource with a collection endpoint
pub trait Resource: DeserializeOwned + Send {
    /// Collection path relative to the base URL
    const PATH: &'static str;
}

/// Vendor or customer a transaction is recorded against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counterparty {
    pub id: CounterpartyId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
}

impl Resource for Counterparty {
    const PATH: &'static str = "counterparties";
}

/// Body of a counterparty create call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterpartyFields {
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Direction of a transaction
///
/// Parsing folds case once, so "credit", "Credit" and "CREDIT" are all
/// [`TransactionType::Credit`]. Anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Credit,
    Debit,
    Other(String),
}

impl TransactionType {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "credit" => TransactionType::Credit,
            "debit" => TransactionType::Debit,
            _ => TransactionType::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Credit => "Credit",
            TransactionType::Debit => "Debit",
            TransactionType::Other(raw) => raw,
        }
    }

    /// Credit or Debit
    pub fn is_known(&self) -> bool {
        !matches!(self, TransactionType::Other(_))
    }
}

impl From<String> for TransactionType {
    fn from(raw: String) -> Self {
        TransactionType::parse(&raw)
    }
}

impl From<TransactionType> for String {
    fn from(value: TransactionType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded credit or debit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub counterparty_id: CounterpartyId,
    #[serde(with = "wire_amount")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(with = "wire_date")]
    pub date: NaiveDateTime,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

impl Transaction {
    /// Calendar date, time of day dropped
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

impl Resource for Transaction {
    const PATH: &'static str = "transactions";
}

/// Body of a transaction create or update call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFields {
    pub counterparty_id: CounterpartyId,
    #[serde(with = "wire_amount")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(with = "wire_date")]
    pub date: NaiveDateTime,
    pub description: String,
}

/// Account role; unknown roles are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Standard,
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "admin" => Role::Admin,
            "standard" => Role::Standard,
            _ => Role::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "Admin",
            Role::Standard => "Standard",
            Role::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account, visible to admins only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub is_active: bool,
}

impl Resource for Account {
    const PATH: &'static str = "accounts";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub role: Option<Role>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse the date forms the service emits: RFC 3339, naive date-time, or bare date
pub fn parse_wire_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Dates are sent as `YYYY-MM-DDTHH:MM:SS` and accepted in any form [`parse_wire_date`] knows
pub mod wire_date {
    use chrono::NaiveDateTime;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_wire_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw)))
    }
}

/// Amounts go out as exact JSON numbers; numbers or numeric strings are accepted
///
/// Relies on serde_json's `arbitrary_precision` so no digit passes through `f64`.
pub mod wire_amount {
    use rust_decimal::Decimal;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::arbitrary_precision::serialize(amount, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        rust_decimal::serde::arbitrary_precision::deserialize(deserializer)
    }
}
