//! Streaming aggregation engine for Sluice.
//!
//! This crate holds the transport-independent core of the aggregate stage:
//!
//! - [`Accumulator`] - per-connection running count/sum per event type, plus
//!   the scored work-items seen on the connection
//! - [`score`] - the derived score computed for every `work-item` event
//! - [`RawEvent`] / [`EnrichedEvent`] - the events consumed from upstream
//! - [`AggregateResult`] - the unit emitted when the accumulator is flushed
//!
//! Nothing here knows about gRPC; the RPC crate converts wire messages into
//! these types and drives the accumulator from its ingestion loops.

mod accumulator;
mod event;
mod scorer;
mod workitem;

pub use accumulator::{Accumulator, AggregateEntry, AggregateResult};
pub use event::{EnrichedEvent, RawEvent};
pub use scorer::{SCORE_ITERATIONS, score};
pub use workitem::{WorkItemError, WorkItemPayload, WorkItemResult};

/// Event type that carries a JSON work-item payload instead of a plain value.
pub const WORK_ITEM_TYPE: &str = "work-item";
