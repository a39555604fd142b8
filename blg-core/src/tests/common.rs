use crate::Config;
use crate::clock::Clock;
use crate::render::TimestampFormat;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

/// Test helper to create a default `Config` for testing purposes.
///
/// This is the single source of truth for test configuration.
/// If you add a field to `Config`, you only need to update it here.
pub fn mk_config(data_dir: PathBuf) -> Config {
    Config {
        data_dir,
        store_key: "blogs".to_string(),
        editor: None,
        timestamp_format: TimestampFormat::default(),
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 15, 10, 0, 0).unwrap()
}

/// Returns `current` and moves it forward by `step` on every call.
#[derive(Clone)]
pub struct StepClock {
    current: Rc<Cell<DateTime<Utc>>>,
    step: Duration,
}

impl StepClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Rc::new(Cell::new(start)),
            step,
        }
    }

    pub fn rewind(&self, by: Duration) {
        self.current.set(self.current.get() - by);
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.current.get();
        self.current.set(now + self.step);
        now
    }
}
