use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Local, Timelike, Utc};

use crate::model::view::TimeOfDay;

/// Source of "now" for the store: timestamps, overdue checks and timers
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Hour of the day on the local wall clock
    fn local_hour(&self) -> u32 {
        self.now().with_timezone(&Local).hour()
    }

    fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.local_hour())
    }
}

/// Real wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
    hour: Rc<Cell<Option<u32>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: Rc::new(Cell::new(start)),
            hour: Rc::new(Cell::new(None)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        let step = chrono::Duration::milliseconds(by.as_millis() as i64);
        self.now.set(self.now.get() + step);
    }

    /// Pin the local hour regardless of the host time zone
    pub fn set_local_hour(&self, hour: u32) {
        self.hour.set(Some(hour));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn local_hour(&self) -> u32 {
        self.hour
            .get()
            .unwrap_or_else(|| self.now.get().with_timezone(&Local).hour())
    }
}
