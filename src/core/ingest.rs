//! Decoding of bulk fairshare updates sent by the accounting service.
//!
//! A payload is either a single entry or a `{"data": [...]}` batch. Numeric
//! fields arrive as decimal strings; plain JSON numbers are accepted as well.
//! Decoding is all-or-nothing: one bad entry rejects the whole payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::store::{BankUpdate, UserId};
use crate::core::IngestError;

/// A scalar that the accounting service may send as a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Textual form, e.g. `"0.5"`.
    Text(String),
    /// JSON number form, e.g. `0.5`.
    Number(serde_json::Number),
}

impl Scalar {
    fn text(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_owned(),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// One entry of a bulk update request as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecUpdateEntry {
    /// User id.
    #[serde(alias = "user_id")]
    pub userid: Scalar,
    /// Bank the record belongs to.
    pub bank: String,
    /// User's default bank.
    pub default_bank: String,
    /// Fairshare ratio.
    pub fairshare: Scalar,
    /// Active job limit.
    pub max_jobs: Scalar,
}

impl TryFrom<RecUpdateEntry> for BankUpdate {
    type Error = IngestError;

    fn try_from(entry: RecUpdateEntry) -> Result<Self, Self::Error> {
        let user_id: UserId = parse_field("userid", &entry.userid)?;
        let fairshare: f64 = parse_field("fairshare", &entry.fairshare)?;
        if !fairshare.is_finite() || fairshare < 0.0 {
            return Err(IngestError::InvalidNumber {
                field: "fairshare",
                value: entry.fairshare.text(),
            });
        }
        let max_jobs: u32 = parse_field("max_jobs", &entry.max_jobs)?;

        if entry.bank.is_empty() {
            return Err(IngestError::EmptyField("bank"));
        }
        if entry.default_bank.is_empty() {
            return Err(IngestError::EmptyField("default_bank"));
        }

        Ok(Self {
            user_id,
            bank: entry.bank,
            default_bank: entry.default_bank,
            fairshare,
            max_jobs,
        })
    }
}

fn parse_field<T: std::str::FromStr>(field: &'static str, raw: &Scalar) -> Result<T, IngestError> {
    let text = raw.text();
    text.parse::<T>()
        .map_err(|_| IngestError::InvalidNumber { field, value: text })
}

/// Decode a raw update payload into validated updates.
///
/// # Errors
///
/// Returns [`IngestError`] if the payload is not JSON, an entry is missing a
/// field, a numeric field does not parse, or a batch is empty.
pub fn parse_update(payload: &str) -> Result<Vec<BankUpdate>, IngestError> {
    let value: Value = serde_json::from_str(payload)?;
    parse_update_value(&value)
}

/// Same as [`parse_update`] for an already decoded JSON value.
///
/// # Errors
///
/// See [`parse_update`].
pub fn parse_update_value(value: &Value) -> Result<Vec<BankUpdate>, IngestError> {
    let entries = match value.get("data") {
        Some(data) => Vec::<RecUpdateEntry>::deserialize(data)?,
        None => vec![RecUpdateEntry::deserialize(value)?],
    };
    if entries.is_empty() {
        return Err(IngestError::EmptyBatch);
    }
    entries.into_iter().map(BankUpdate::try_from).collect()
}
