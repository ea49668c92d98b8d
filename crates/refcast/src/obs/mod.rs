//! Metrics sink boundary.
//!
//! Resolution logic does not touch counter state directly; all
//! instrumentation flows through `MetricsEvent` and `MetricsSink`.

use crate::{error::ErrorClass, naming::TableName};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

///
/// MetricsEvent
///

#[derive(Clone, Debug)]
pub enum MetricsEvent {
    ResolveAttempt { table: TableName },
    ResolveHit { table: TableName },
    ResolveMiss { table: TableName, class: ErrorClass },
}

///
/// MetricsSink
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent);
}

///
/// TableCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TableCounters {
    pub attempts: u64,
    pub hits: u64,
    pub misses_by_class: BTreeMap<String, u64>,
}

///
/// MetricsSnapshot
///
/// Point-in-time counter report for observability surfaces.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MetricsSnapshot {
    pub attempts: u64,
    pub hits: u64,
    pub misses: u64,
    pub tables: BTreeMap<String, TableCounters>,
}

///
/// CounterSink
///
/// Provided sink accumulating per-table resolution counters.
///

#[derive(Default)]
pub struct CounterSink {
    state: RwLock<MetricsSnapshot>,
}

impl CounterSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MetricsSnapshot> {
        self.state
            .read()
            .expect("metrics RwLock poisoned while acquiring read lock")
    }

    fn write(&self) -> RwLockWriteGuard<'_, MetricsSnapshot> {
        self.state
            .write()
            .expect("metrics RwLock poisoned while acquiring write lock")
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.read().clone()
    }
}

impl MetricsSink for CounterSink {
    fn record(&self, event: MetricsEvent) {
        let mut state = self.write();
        match event {
            MetricsEvent::ResolveAttempt { table } => {
                state.attempts = state.attempts.saturating_add(1);
                let entry = state.tables.entry(table.to_string()).or_default();
                entry.attempts = entry.attempts.saturating_add(1);
            }
            MetricsEvent::ResolveHit { table } => {
                state.hits = state.hits.saturating_add(1);
                let entry = state.tables.entry(table.to_string()).or_default();
                entry.hits = entry.hits.saturating_add(1);
            }
            MetricsEvent::ResolveMiss { table, class } => {
                state.misses = state.misses.saturating_add(1);
                let entry = state.tables.entry(table.to_string()).or_default();
                let count = entry.misses_by_class.entry(class.to_string()).or_default();
                *count = count.saturating_add(1);
            }
        }
    }
}
