//! Upstream response shapes.
//!
//! The Freelancer API is loose about which fields it returns (they depend on the detail
//! flags a request asks for, and older records are sparse). Every field here is optional
//! and decoded leniently: a field with an unexpected type decodes as `None` instead of
//! failing the whole record, so the normalizer can rely on "absent means `None`".

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Number, Value};

/// Decode an optional field, mapping type mismatches (and explicit `null`) to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Decode an optional list, keeping the list even if individual items are malformed.
///
/// Items that are not objects of the expected shape become `T::default()`.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .map(|item| T::deserialize(item).unwrap_or_default())
            .collect(),
    ))
}

/// Decode a raw upstream record, falling back to the all-`None` shape.
#[must_use]
pub fn decode_record<T: DeserializeOwned + Default>(raw: Value) -> T {
    T::deserialize(raw).unwrap_or_default()
}

/// `{ status, result, message, error_code }` wrapper around every API response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

/// `result` of `projects/0.1/projects/active/`.
///
/// Records are kept raw so that truncation happens before any per-record decoding.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectsPage {
    #[serde(default, deserialize_with = "lenient")]
    pub projects: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_count: Option<u64>,
}

/// `result` of `users/0.1/users/directory/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersPage {
    #[serde(default, deserialize_with = "lenient")]
    pub users: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub budget: Option<Budget>,
    #[serde(default, deserialize_with = "lenient")]
    pub owner: Option<Owner>,
    /// Epoch seconds upstream, but older records carry strings.
    #[serde(default, deserialize_with = "lenient")]
    pub time_updated: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub submitdate: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub bid_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Budget {
    #[serde(default, deserialize_with = "lenient")]
    pub minimum: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub maximum: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Currency {
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Owner {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<Location>,
    /// Flag object upstream; passed through untouched.
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub reputation: Option<Reputation>,
    #[serde(default, deserialize_with = "lenient")]
    pub hourly_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub jobs: Option<Vec<Job>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "lenient")]
    pub country: Option<Place>,
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<Place>,
}

/// A country or city: either `{ "name": ... }` or a bare string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Place {
    Name(String),
    Named {
        #[serde(default, deserialize_with = "lenient")]
        name: Option<String>,
    },
}

impl Place {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Named { name } => name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Reputation {
    #[serde(default, deserialize_with = "lenient")]
    pub entire_site: Option<SiteReputation>,
    #[serde(default, deserialize_with = "lenient")]
    pub category_ratings: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SiteReputation {
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Job {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}
