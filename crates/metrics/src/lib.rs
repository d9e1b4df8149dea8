//! Latency instrumentation for Sluice connections.
//!
//! Every connection owns one [`ConnectionMetrics`] record. The ingestion loop
//! times its receive, processing and send phases and feeds the elapsed
//! durations in; when the connection closes the loop derives a
//! [`MetricsSummary`] and emits it.
//!
//! The record is a plain struct updated through `&mut`. It is diagnostic only
//! and never fails.

mod connection;
mod summary;

pub use connection::ConnectionMetrics;
pub use summary::MetricsSummary;
