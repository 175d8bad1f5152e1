//! Wall-clock source for log timestamps

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock anchored at a fixed instant that advances with Tokio time.
///
/// Under a paused runtime the stamps follow `tokio::time::advance` exactly,
/// which keeps tick timestamps deterministic in tests.
#[derive(Debug, Clone)]
pub struct RuntimeClock {
    origin: DateTime<Utc>,
    started: tokio::time::Instant,
}

impl RuntimeClock {
    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Clock for RuntimeClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = self.started.elapsed();
        chrono::Duration::from_std(elapsed)
            .map(|d| self.origin + d)
            .unwrap_or(self.origin)
    }
}
