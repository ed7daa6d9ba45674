use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Scheduling order; breaks ties between equal deadlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TimerId(u64);

/// Single-shot timers ordered by deadline, then by scheduling order.
///
/// Nothing fires on its own: the owner calls [`TimerQueue::pop_due`] with the
/// current time and applies the returned payloads. Driving it from a manual
/// clock makes deferred behaviour fast-forwardable in tests.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(DateTime<Utc>, TimerId), T>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        TimerQueue {
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: DateTime<Utc>, payload: T) {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert((deadline, id), payload);
    }

    /// Schedule `payload` to become due `delay` after `now`. A delay too
    /// large to represent makes the timer due at `now`.
    pub fn schedule_after(&mut self, now: DateTime<Utc>, delay: Duration, payload: T) {
        let deadline = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(now);
        self.schedule(deadline, payload);
    }

    /// Remove and return every payload whose deadline is at or before `now`,
    /// earliest first.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Vec<T> {
        let mut due = Vec::new();
        while let Some(entry) = self.entries.first_entry() {
            if entry.key().0 > now {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    /// Remove and return the earliest pending payload regardless of deadline.
    pub fn pop_next(&mut self) -> Option<(DateTime<Utc>, T)> {
        self.entries
            .pop_first()
            .map(|((deadline, _), payload)| (deadline, payload))
    }

    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over pending payloads in firing order
    pub fn pending(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }
}
