//! Bounded record of committed transitions.
//!
//! The log keeps the most recent [`LOG_CAPACITY`] transitions in a fixed
//! ring, so a long-running machine never grows its storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of transitions retained by a [`TransitionLog`].
pub const LOG_CAPACITY: usize = 16;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use bitfsm::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: 0,
///     to: 2,
///     tick: 7,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being left
    pub from: usize,
    /// The state being entered
    pub to: usize,
    /// Zero-based number of the tick that committed the transition
    pub tick: u64,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

/// Ring buffer of the latest committed transitions, oldest first.
///
/// # Example
///
/// ```rust
/// use bitfsm::core::{TransitionLog, TransitionRecord};
/// use chrono::Utc;
///
/// let mut log = TransitionLog::new();
/// log.record(TransitionRecord { from: 0, to: 1, tick: 0, timestamp: Utc::now() });
/// log.record(TransitionRecord { from: 1, to: 2, tick: 3, timestamp: Utc::now() });
///
/// let path: Vec<usize> = log.path().collect();
/// assert_eq!(path, vec![0, 1, 2]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransitionLog {
    records: [Option<TransitionRecord>; LOG_CAPACITY],
    next: usize,
    len: usize,
    total: u64,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord) {
        self.records[self.next] = Some(record);
        self.next = (self.next + 1) % LOG_CAPACITY;
        self.len = (self.len + 1).min(LOG_CAPACITY);
        self.total += 1;
    }

    /// Retained records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TransitionRecord> + '_ {
        let start = (self.next + LOG_CAPACITY - self.len) % LOG_CAPACITY;
        (0..self.len).filter_map(move |i| self.records[(start + i) % LOG_CAPACITY].as_ref())
    }

    pub fn latest(&self) -> Option<&TransitionRecord> {
        self.iter().last()
    }

    /// States traversed by the retained records: the first record's
    /// origin, then every destination.
    pub fn path(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter()
            .next()
            .map(|first| first.from)
            .into_iter()
            .chain(self.iter().map(|record| record.to))
    }

    /// Time between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.iter().next()?;
        let last = self.latest()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Transitions recorded since creation or the last clear, including evicted ones.
    pub fn total_recorded(&self) -> u64 {
        self.total
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
