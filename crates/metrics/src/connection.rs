//! Phase timers for a single connection.

use std::time::Duration;

use tracing::{debug, info};

use crate::MetricsSummary;

/// Running phase totals for one connection.
#[derive(Debug, Clone)]
pub struct ConnectionMetrics {
    service_name: &'static str,
    events_processed: u64,
    processing: Duration,
    send: Duration,
    recv: Duration,
}

impl ConnectionMetrics {
    /// Create an empty record labelled with the service name.
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            events_processed: 0,
            processing: Duration::ZERO,
            send: Duration::ZERO,
            recv: Duration::ZERO,
        }
    }

    /// Add time spent waiting for the next request.
    pub fn record_recv(&mut self, elapsed: Duration) {
        self.recv += elapsed;
    }

    /// Add time spent processing a single event.
    pub fn record_processing(&mut self, elapsed: Duration) {
        self.record_processing_count(elapsed, 1);
    }

    /// Add time spent processing `count` events together.
    pub fn record_processing_count(&mut self, elapsed: Duration, count: u64) {
        self.processing += elapsed;
        self.events_processed += count;
    }

    /// Add time spent handing a response to the transport.
    pub fn record_send(&mut self, elapsed: Duration) {
        self.send += elapsed;
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    pub fn processing_time(&self) -> Duration {
        self.processing
    }

    pub fn send_time(&self) -> Duration {
        self.send
    }

    pub fn recv_time(&self) -> Duration {
        self.recv
    }

    /// Derive the closing summary.
    ///
    /// Returns `None` when no events were processed or no time was recorded.
    pub fn summary(&self) -> Option<MetricsSummary> {
        let total = self.processing + self.send + self.recv;
        if self.events_processed == 0 || total.is_zero() {
            return None;
        }

        Some(MetricsSummary {
            service_name: self.service_name,
            events_processed: self.events_processed,
            total,
            processing: self.processing,
            send: self.send,
            recv: self.recv,
        })
    }

    /// Log the closing summary, if there is one.
    pub fn emit_summary(&self) {
        let Some(summary) = self.summary() else {
            return;
        };

        info!(
            service = summary.service_name,
            events = summary.events_processed,
            total_ms = summary.total_ms(),
            processing_ms = summary.processing_ms(),
            processing_pct = summary.processing_pct(),
            send_ms = summary.send_ms(),
            send_pct = summary.send_pct(),
            recv_ms = summary.recv_ms(),
            recv_pct = summary.recv_pct(),
            avg_processing_ms = summary.avg_processing_ms(),
            avg_send_ms = summary.avg_send_ms(),
            avg_recv_ms = summary.avg_recv_ms(),
            "Connection metrics"
        );
        debug!("{summary}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_empty() {
        let metrics = ConnectionMetrics::new("test");
        assert_eq!(metrics.events_processed(), 0);
        assert!(metrics.processing_time().is_zero());
        assert!(metrics.summary().is_none());
    }

    #[test]
    fn test_phases_accumulate() {
        let mut metrics = ConnectionMetrics::new("test");
        metrics.record_recv(Duration::from_millis(2));
        metrics.record_recv(Duration::from_millis(3));
        metrics.record_processing(Duration::from_millis(4));
        metrics.record_processing_count(Duration::from_millis(6), 9);
        metrics.record_send(Duration::from_millis(1));

        assert_eq!(metrics.recv_time(), Duration::from_millis(5));
        assert_eq!(metrics.processing_time(), Duration::from_millis(10));
        assert_eq!(metrics.send_time(), Duration::from_millis(1));
        assert_eq!(metrics.events_processed(), 10);
    }

    #[test]
    fn test_no_summary_without_events() {
        let mut metrics = ConnectionMetrics::new("test");
        metrics.record_recv(Duration::from_millis(7));
        metrics.record_send(Duration::from_millis(1));
        assert!(metrics.summary().is_none());
    }

    #[test]
    fn test_no_summary_without_time() {
        let mut metrics = ConnectionMetrics::new("test");
        metrics.record_processing_count(Duration::ZERO, 3);
        assert!(metrics.summary().is_none());
    }

    #[test]
    fn test_summary_totals() {
        let mut metrics = ConnectionMetrics::new("aggregate-service");
        metrics.record_recv(Duration::from_millis(10));
        metrics.record_processing_count(Duration::from_millis(30), 4);
        metrics.record_send(Duration::from_millis(60));

        let summary = metrics.summary().unwrap();
        assert_eq!(summary.service_name, "aggregate-service");
        assert_eq!(summary.events_processed, 4);
        assert_eq!(summary.total, Duration::from_millis(100));
    }
}
