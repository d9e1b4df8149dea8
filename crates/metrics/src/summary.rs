//! Closing report derived from a connection's phase totals.

use std::fmt;
use std::time::Duration;

/// Phase breakdown for one finished connection.
///
/// Only built when at least one event was processed, so the per-event
/// averages never divide by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub service_name: &'static str,
    pub events_processed: u64,
    pub total: Duration,
    pub processing: Duration,
    pub send: Duration,
    pub recv: Duration,
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

impl MetricsSummary {
    fn share(&self, phase: Duration) -> f64 {
        phase.as_secs_f64() / self.total.as_secs_f64() * 100.0
    }

    fn per_event(&self, phase: Duration) -> f64 {
        millis(phase) / self.events_processed as f64
    }

    pub fn total_ms(&self) -> f64 {
        millis(self.total)
    }

    pub fn processing_ms(&self) -> f64 {
        millis(self.processing)
    }

    pub fn send_ms(&self) -> f64 {
        millis(self.send)
    }

    pub fn recv_ms(&self) -> f64 {
        millis(self.recv)
    }

    pub fn processing_pct(&self) -> f64 {
        self.share(self.processing)
    }

    pub fn send_pct(&self) -> f64 {
        self.share(self.send)
    }

    pub fn recv_pct(&self) -> f64 {
        self.share(self.recv)
    }

    pub fn avg_processing_ms(&self) -> f64 {
        self.per_event(self.processing)
    }

    pub fn avg_send_ms(&self) -> f64 {
        self.per_event(self.send)
    }

    pub fn avg_recv_ms(&self) -> f64 {
        self.per_event(self.recv)
    }
}

impl fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} Metrics ===", self.service_name)?;
        writeln!(f, "Events processed: {}", self.events_processed)?;
        writeln!(
            f,
            "Processing time: {:.2}ms ({:.1}%)",
            self.processing_ms(),
            self.processing_pct()
        )?;
        writeln!(f, "IPC Send time: {:.2}ms ({:.1}%)", self.send_ms(), self.send_pct())?;
        writeln!(f, "IPC Recv time: {:.2}ms ({:.1}%)", self.recv_ms(), self.recv_pct())?;
        writeln!(f, "Avg per event:")?;
        writeln!(f, "  Processing: {:.4}ms", self.avg_processing_ms())?;
        writeln!(f, "  IPC Send: {:.4}ms", self.avg_send_ms())?;
        write!(f, "  IPC Recv: {:.4}ms", self.avg_recv_ms())
    }
}
