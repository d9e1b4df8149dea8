//! Work-item payloads and their scored results.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::{AggregateResult, score};

/// Errors decoding a work-item payload.
#[derive(Debug, Error)]
pub enum WorkItemError {
    #[error("Invalid work-item payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Work-item body carried as JSON in the event payload.
///
/// Missing and `null` fields decode to their zero value.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct WorkItemPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub eigenvalues: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl WorkItemPayload {
    /// Decode a payload from its JSON text. A bare `null` is the zero payload.
    pub fn decode(payload: &str) -> Result<Self, WorkItemError> {
        let item: Option<Self> = serde_json::from_str(payload)?;
        Ok(item.unwrap_or_default())
    }
}

/// Score computed for one work-item. Kept per item, never merged into a key.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItemResult {
    pub id: String,
    pub final_score: f64,
}

impl WorkItemResult {
    /// Decode and score a payload in one step.
    pub fn from_payload(payload: &str) -> Result<Self, WorkItemError> {
        let item = WorkItemPayload::decode(payload)?;
        let final_score = score(&item);
        Ok(Self {
            id: item.id,
            final_score,
        })
    }
}

impl From<&WorkItemResult> for AggregateResult {
    /// Work-items reuse the aggregate result shape: the id as key, a zero
    /// count, the rounded score as sum and the exact score as average.
    fn from(item: &WorkItemResult) -> Self {
        Self {
            key: item.id.clone(),
            count: 0,
            sum: item.final_score.round() as i64,
            avg: item.final_score,
        }
    }
}
