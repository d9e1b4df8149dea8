//! Events consumed by the aggregate stage.

use crate::WORK_ITEM_TYPE;

/// A parsed event as produced by the upstream parse stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawEvent {
    /// Classification key.
    pub event_type: String,
    /// Value added to the key's running sum.
    pub value: i64,
    /// Opaque payload. Holds JSON for `work-item` events.
    pub payload: String,
}

impl RawEvent {
    /// Create a plain keyed event with an empty payload.
    pub fn new(event_type: impl Into<String>, value: i64) -> Self {
        Self {
            event_type: event_type.into(),
            value,
            payload: String::new(),
        }
    }

    /// Create a `work-item` event carrying the given JSON payload.
    pub fn work_item(payload: impl Into<String>) -> Self {
        Self {
            event_type: WORK_ITEM_TYPE.to_string(),
            value: 0,
            payload: payload.into(),
        }
    }

    /// Whether this event must be routed through the scorer.
    pub fn is_work_item(&self) -> bool {
        self.event_type == WORK_ITEM_TYPE
    }
}

/// A [`RawEvent`] annotated by the rules stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedEvent {
    pub event: RawEvent,
    /// Only events that passed the rules contribute to aggregation.
    pub passed_rules: bool,
}

impl EnrichedEvent {
    pub fn passed(event: RawEvent) -> Self {
        Self {
            event,
            passed_rules: true,
        }
    }

    pub fn rejected(event: RawEvent) -> Self {
        Self {
            event,
            passed_rules: false,
        }
    }
}
