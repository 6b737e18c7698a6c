//! Fixed-shape records built from upstream search results.
//!
//! Every key is always present in the serialized output. Missing scalars and objects become
//! `null`, missing nested objects become their shape with `null` leaves, and missing lists
//! become `[]`. None of these functions can fail.

use crate::api::models::{self, Place, Project, User};
use serde::Serialize;
use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub budget: BudgetRecord,
    pub owner: OwnerRecord,
    pub time_updated: Option<String>,
    pub submitdate: Option<String>,
    pub bid_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetRecord {
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OwnerRecord {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreelancerRecord {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub location: LocationRecord,
    pub status: Option<Value>,
    pub reputation: ReputationRecord,
    pub hourly_rate: Option<f64>,
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationRecord {
    pub country: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReputationRecord {
    pub entire_site: Option<f64>,
    pub category_ratings: Value,
}

impl Default for ReputationRecord {
    fn default() -> Self {
        Self {
            entire_site: None,
            category_ratings: Value::Array(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Normalize at most `limit` records, in order, skipping the rest without touching them.
pub fn take_normalized<T, R>(
    raw: impl IntoIterator<Item = T>,
    limit: usize,
    normalize: impl FnMut(T) -> R,
) -> Vec<R> {
    raw.into_iter().take(limit).map(normalize).collect()
}

/// Decode and normalize one raw project record.
#[must_use]
pub fn project_from_value(raw: Value) -> ProjectRecord {
    normalize_project(&models::decode_record(raw))
}

/// Decode and normalize one raw user record.
#[must_use]
pub fn freelancer_from_value(raw: Value) -> FreelancerRecord {
    normalize_freelancer(&models::decode_record(raw))
}

#[must_use]
pub fn normalize_project(project: &Project) -> ProjectRecord {
    ProjectRecord {
        id: project.id,
        title: project.title.clone(),
        description: project.description.clone(),
        kind: project.kind.clone(),
        budget: project
            .budget
            .as_ref()
            .map(|b| BudgetRecord {
                minimum: b.minimum.clone(),
                maximum: b.maximum.clone(),
                currency: b.currency.as_ref().and_then(|c| c.code.clone()),
            })
            .unwrap_or_default(),
        owner: project
            .owner
            .as_ref()
            .map(|o| OwnerRecord {
                id: o.id,
                username: o.username.clone(),
                display_name: o.display_name.clone(),
            })
            .unwrap_or_default(),
        time_updated: project.time_updated.as_ref().and_then(scalar_text),
        submitdate: project.submitdate.as_ref().and_then(scalar_text),
        bid_count: project.bid_count,
    }
}

#[must_use]
pub fn normalize_freelancer(user: &User) -> FreelancerRecord {
    FreelancerRecord {
        id: user.id,
        username: user.username.clone(),
        display_name: user.display_name.clone(),
        avatar: user.avatar.clone(),
        location: user
            .location
            .as_ref()
            .map(|l| LocationRecord {
                country: place_name(l.country.as_ref()),
                city: place_name(l.city.as_ref()),
            })
            .unwrap_or_default(),
        status: user.status.clone().filter(|s| !s.is_null()),
        reputation: user
            .reputation
            .as_ref()
            .map(|r| ReputationRecord {
                entire_site: r.entire_site.as_ref().and_then(|s| s.rating),
                category_ratings: r
                    .category_ratings
                    .clone()
                    .filter(|c| !c.is_null())
                    .unwrap_or_else(|| Value::Array(Vec::new())),
            })
            .unwrap_or_default(),
        hourly_rate: user.hourly_rate,
        jobs: user
            .jobs
            .iter()
            .flatten()
            .map(|j| JobRecord {
                id: j.id,
                name: j.name.clone(),
            })
            .collect(),
    }
}

fn place_name(place: Option<&Place>) -> Option<String> {
    place.and_then(Place::name).map(str::to_string)
}

/// Render a timestamp-ish scalar as text; objects, arrays and `null` have no text form.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
