//! Shared fixtures for integration tests.

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

/// Clock frozen at one epoch-millisecond instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.0).expect("fixed instant in range")
    }
}
