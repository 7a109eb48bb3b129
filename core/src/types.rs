//! Domain DTOs for the persons API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Every envelope field is defaulted: the client hands the server's reply
//! back verbatim and leaves interpretation to the page. Integration tests
//! catch any schema drift between the two crates.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Server-assigned identifier of a person.
///
/// Opaque to the client: the server may send a JSON number or a JSON string,
/// and the id is written back into URLs exactly as received. Two ids are
/// equal when they print the same, so `Number(42)` matches typed-in `"42"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonId {
    Number(u64),
    Text(String),
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonId::Number(n) => write!(f, "{n}"),
            PersonId::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for PersonId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PersonId::Number(a), PersonId::Number(b)) => a == b,
            (PersonId::Text(a), PersonId::Text(b)) => a == b,
            (PersonId::Number(n), PersonId::Text(s)) | (PersonId::Text(s), PersonId::Number(n)) => {
                *s == n.to_string()
            }
        }
    }
}

impl Eq for PersonId {}

impl Hash for PersonId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            PersonId::Number(n) => n.to_string().hash(state),
            PersonId::Text(s) => s.hash(state),
        }
    }
}

/// Keeps the text verbatim; `007` stays `007`.
impl FromStr for PersonId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PersonId::Text(s.to_string()))
    }
}

impl From<u64> for PersonId {
    fn from(n: u64) -> Self {
        PersonId::Number(n)
    }
}

/// A single person record returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Timestamps are informational, so one the client cannot read becomes
/// `None` instead of failing the whole record. Zoned values are kept as UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::String(raw) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(raw
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(&raw).ok().map(|t| t.naive_utc())))
}

/// Request payload for both creating and replacing a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
}

impl From<&Person> for PersonRequest {
    fn from(p: &Person) -> Self {
        Self {
            full_name: p.full_name.clone(),
            email: p.email.clone(),
            phone_number: p.phone_number.clone(),
        }
    }
}

/// A validation failure the server attributes to one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// The `{ success, data, message }` wrapper the server returns for every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl<T> Envelope<T> {
    /// The server's message, or `fallback` when it sent none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}
