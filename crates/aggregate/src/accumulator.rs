//! Per-connection aggregation state.

use std::collections::HashMap;

use tracing::debug;

use crate::{EnrichedEvent, RawEvent, WorkItemResult};

/// Running statistics for one classification key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateEntry {
    pub count: i64,
    pub sum: i64,
}

impl AggregateEntry {
    /// Both totals wrap on overflow, whatever the build profile.
    fn observe(&mut self, value: i64) {
        self.count = self.count.wrapping_add(1);
        self.sum = self.sum.wrapping_add(value);
    }

    /// Mean of the observed values, or `0.0` before the first observation.
    pub fn avg(&self) -> f64 {
        debug_assert!(self.count >= 0, "aggregate count went negative");
        if self.count > 0 {
            self.sum as f64 / self.count as f64
        } else {
            0.0
        }
    }
}

/// Unit of output produced by [`Accumulator::flush`].
///
/// Keyed aggregates fill every field from their [`AggregateEntry`].
/// Work-items reuse the same shape (see `From<&WorkItemResult>`).
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub key: String,
    pub count: i64,
    pub sum: i64,
    pub avg: f64,
}

impl AggregateResult {
    fn keyed(key: &str, entry: &AggregateEntry) -> Self {
        Self {
            key: key.to_string(),
            count: entry.count,
            sum: entry.sum,
            avg: entry.avg(),
        }
    }
}

/// Aggregation state owned by a single connection.
///
/// Keys are created on first observation and never removed. Work-items are
/// scored on arrival and kept in arrival order.
#[derive(Debug, Default)]
pub struct Accumulator {
    entries: HashMap<String, AggregateEntry>,
    work_items: Vec<WorkItemResult>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the state.
    ///
    /// A `work-item` whose payload fails to decode is dropped without
    /// touching any other state.
    pub fn observe(&mut self, event: &RawEvent) {
        if event.is_work_item() {
            match WorkItemResult::from_payload(&event.payload) {
                Ok(item) => self.work_items.push(item),
                Err(error) => debug!(%error, "Dropping work-item"),
            }
            return;
        }

        match self.entries.get_mut(&event.event_type) {
            Some(entry) => entry.observe(event.value),
            None => {
                let mut entry = AggregateEntry::default();
                entry.observe(event.value);
                self.entries.insert(event.event_type.clone(), entry);
            }
        }
    }

    /// Fold every event of a batch that passed the rules.
    ///
    /// Returns the number of events considered, including rejected events
    /// and dropped work-items.
    pub fn observe_batch(&mut self, events: &[EnrichedEvent]) -> usize {
        for enriched in events.iter().filter(|e| e.passed_rules) {
            self.observe(&enriched.event);
        }
        events.len()
    }

    /// Statistics for a key, if it has been observed.
    pub fn entry(&self, key: &str) -> Option<&AggregateEntry> {
        self.entries.get(key)
    }

    /// Scored work-items in arrival order.
    pub fn work_items(&self) -> &[WorkItemResult] {
        &self.work_items
    }

    /// Number of results the next [`flush`](Self::flush) will produce.
    pub fn len(&self) -> usize {
        self.entries.len() + self.work_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Produce the results accumulated so far.
    ///
    /// Work-items come first, in arrival order, followed by one result per
    /// key in no particular order. The state is left untouched.
    pub fn flush(&self) -> Vec<AggregateResult> {
        let mut results = Vec::with_capacity(self.len());
        results.extend(self.work_items.iter().map(AggregateResult::from));
        results.extend(
            self.entries
                .iter()
                .map(|(key, entry)| AggregateResult::keyed(key, entry)),
        );
        results
    }
}
