//! Benchmark entries and the append-only result log

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use vc_core::BackendId;

/// One recorded observation: which backend ran and how long it took
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    /// Position in the log, assigned at append time
    pub sequence: u64,
    pub backend: BackendId,
    /// Wall-clock time around the single backend call
    pub elapsed: Duration,
    pub output_len: usize,
    /// Short digest of the produced buffer
    pub checksum: String,
}

impl BenchmarkEntry {
    /// Elapsed time in whole milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// `"<seq>: <label> <ms> ms"`
    pub fn display_line(&self) -> String {
        format!(
            "{}: {} {} ms",
            self.sequence,
            self.backend.label(),
            self.elapsed_ms()
        )
    }
}

struct LogInner {
    entries: VecDeque<BenchmarkEntry>,
    next_sequence: u64,
}

/// Append-only, insertion-ordered log of benchmark entries.
///
/// Appends are serialized under one lock, so concurrent runs never lose or
/// reorder entries. With a capacity set, the oldest entry is evicted once
/// the log is full; sequence numbers keep counting up regardless.
pub struct ResultLog {
    inner: Mutex<LogInner>,
    capacity: Option<usize>,
}

impl ResultLog {
    /// Unbounded log
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LogInner {
                entries: VecDeque::new(),
                next_sequence: 0,
            }),
            capacity: None,
        }
    }

    /// Log keeping at most `capacity` of the most recent entries (min 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(LogInner {
                entries: VecDeque::new(),
                next_sequence: 0,
            }),
            capacity: Some(capacity),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Record a run; the sequence number is assigned under the lock.
    pub fn append(
        &self,
        backend: BackendId,
        elapsed: Duration,
        output_len: usize,
        checksum: String,
    ) -> BenchmarkEntry {
        let mut inner = self.inner.lock();
        let entry = BenchmarkEntry {
            sequence: inner.next_sequence,
            backend,
            elapsed,
            output_len,
            checksum,
        };
        inner.next_sequence += 1;

        if let Some(capacity) = self.capacity {
            while inner.entries.len() >= capacity {
                inner.entries.pop_front();
            }
        }
        inner.entries.push_back(entry.clone());
        entry
    }

    /// Snapshot of all retained entries, oldest first
    pub fn entries(&self) -> Vec<BenchmarkEntry> {
        self.inner.lock().entries.iter().cloned().collect()
    }

    pub fn last(&self) -> Option<BenchmarkEntry> {
        self.inner.lock().entries.back().cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Display lines of all retained entries, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(BenchmarkEntry::display_line)
            .collect()
    }
}

impl Default for ResultLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResultLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultLog")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
