//! Conversions between wire messages and aggregation types.

use sluice_aggregate::{AggregateResult, EnrichedEvent, RawEvent};

use crate::proto::pipeline as pb;

impl From<pb::ParsedEvent> for RawEvent {
    /// The work-item payload travels in the `user` field.
    fn from(event: pb::ParsedEvent) -> Self {
        Self {
            event_type: event.r#type,
            value: event.value,
            payload: event.user,
        }
    }
}

impl From<pb::EnrichedEvent> for EnrichedEvent {
    /// A wrapper without an inner event is treated as rejected.
    fn from(enriched: pb::EnrichedEvent) -> Self {
        match enriched.event {
            Some(event) => Self {
                event: event.into(),
                passed_rules: enriched.passed_rules,
            },
            None => Self::rejected(RawEvent::default()),
        }
    }
}

impl From<AggregateResult> for pb::AggregateResult {
    fn from(result: AggregateResult) -> Self {
        Self {
            key: result.key,
            count: result.count,
            sum: result.sum,
            avg: result.avg,
        }
    }
}
