//! Simulated monitor loop
//!
//! Two states, Stopped and Running. While running, a Tokio task ticks on a
//! fixed period, composes a status message from the live [`BotConfig`] and
//! prepends it to the bounded [`LogBuffer`]. The task handle is owned by the
//! [`Monitor`] and aborted on `stop()` and on drop.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::{BotConfig, ConfigUpdate};
use crate::log_buffer::{LogBuffer, LogLine};
use crate::ticker::compose_status;

/// Default tick period
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(3000);

/// Shortest accepted tick period; tokio intervals reject zero
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    Stopped,
    Running,
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorState::Stopped => f.write_str("stopped"),
            MonitorState::Running => f.write_str("running"),
        }
    }
}

/// Construction options for [`Monitor`]
#[derive(Clone)]
pub struct MonitorOptions {
    pub tick_interval: Duration,
    /// Fixed seed for message selection, entropy when `None`
    pub rng_seed: Option<u64>,
    pub clock: Arc<dyn Clock>,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            rng_seed: None,
            clock: Arc::new(SystemClock),
        }
    }
}

/// Consistent view of the monitor for rendering
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    pub state: MonitorState,
    pub run_id: Option<Uuid>,
    pub config: BotConfig,
    pub logs: Vec<LogLine>,
    pub ticks: u64,
}

/// State shared between the monitor and its ticker task
struct MonitorStore {
    config: BotConfig,
    logs: LogBuffer,
    rng: StdRng,
    active_run: Option<Uuid>,
    ticks: u64,
}

impl MonitorStore {
    /// Append one status line for `run_id`; false once that run is no longer active
    fn tick(&mut self, run_id: Uuid, at: chrono::DateTime<chrono::Utc>) -> bool {
        if self.active_run != Some(run_id) {
            return false;
        }
        let message = compose_status(&self.config, &mut self.rng);
        debug!("Tick {} for run {}: {}", self.ticks + 1, run_id, message);
        self.logs.push(at, message);
        self.ticks += 1;
        true
    }
}

/// Simulated trading-bot monitor
pub struct Monitor {
    store: Arc<RwLock<MonitorStore>>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    ticker: Option<(Uuid, JoinHandle<()>)>,
}

impl Monitor {
    /// Create a stopped monitor with default options
    pub fn new(config: BotConfig) -> Self {
        Self::with_options(config, MonitorOptions::default())
    }

    pub fn with_options(config: BotConfig, options: MonitorOptions) -> Self {
        let rng = match options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let logs = LogBuffer::seeded(options.clock.now());
        let tick_interval = if options.tick_interval < MIN_TICK_INTERVAL {
            warn!(
                "Tick interval {:?} too short, using {:?}",
                options.tick_interval, MIN_TICK_INTERVAL
            );
            MIN_TICK_INTERVAL
        } else {
            options.tick_interval
        };

        Self {
            store: Arc::new(RwLock::new(MonitorStore {
                config,
                logs,
                rng,
                active_run: None,
                ticks: 0,
            })),
            clock: options.clock,
            tick_interval,
            ticker: None,
        }
    }

    pub fn state(&self) -> MonitorState {
        if self.ticker.is_some() {
            MonitorState::Running
        } else {
            MonitorState::Stopped
        }
    }

    pub fn run_id(&self) -> Option<Uuid> {
        self.ticker.as_ref().map(|(id, _)| *id)
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Stopped -> Running. No-op when already running.
    ///
    /// The first tick fires one full period after this call. Must be called
    /// from within a Tokio runtime.
    pub async fn start(&mut self) -> bool {
        if self.ticker.is_some() {
            debug!("Monitor already running");
            return false;
        }

        let run_id = Uuid::new_v4();
        {
            let mut store = self.store.write().await;
            store.active_run = Some(run_id);
            info!(
                "Monitor '{}' started: run={}, pair={}, venues={}, auto_trade={}",
                store.config.name,
                run_id,
                store.config.primary_pair,
                store.config.target_venues.len(),
                store.config.auto_trade_enabled
            );
        }

        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let period = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticks.tick().await;
                let at = clock.now();
                if !store.write().await.tick(run_id, at) {
                    debug!("Ticker for run {} retired", run_id);
                    break;
                }
            }
        });

        self.ticker = Some((run_id, handle));
        true
    }

    /// Running -> Stopped. No-op when already stopped.
    ///
    /// No line is appended once this returns.
    pub async fn stop(&mut self) -> bool {
        let Some((run_id, handle)) = self.ticker.take() else {
            debug!("Monitor already stopped");
            return false;
        };

        let ticks = {
            let mut store = self.store.write().await;
            store.active_run = None;
            store.ticks
        };
        handle.abort();

        info!("Monitor stopped: run={}, total_ticks={}", run_id, ticks);
        true
    }

    /// Flip between Running and Stopped, returning the new state
    pub async fn toggle(&mut self) -> MonitorState {
        match self.state() {
            MonitorState::Stopped => self.start().await,
            MonitorState::Running => self.stop().await,
        };
        self.state()
    }

    /// Flip venue membership; true if the venue is a target afterwards
    pub async fn toggle_venue(&self, venue: &str) -> bool {
        let mut store = self.store.write().await;
        let added = store.config.toggle_venue(venue);
        debug!(
            "Venue '{}' {} ({} targeted)",
            venue,
            if added { "added" } else { "removed" },
            store.config.target_venues.len()
        );
        added
    }

    /// Unconditional field overwrite, read by the next tick
    pub async fn set_config_field(&self, update: ConfigUpdate) {
        debug!("Config update: {:?}", update);
        self.store.write().await.config.apply(update);
    }

    pub async fn config(&self) -> BotConfig {
        self.store.read().await.config.clone()
    }

    /// Rendered log lines, newest first
    pub async fn logs(&self) -> Vec<String> {
        self.store.read().await.logs.rendered()
    }

    pub async fn snapshot(&self) -> MonitorSnapshot {
        let store = self.store.read().await;
        MonitorSnapshot {
            state: self.state(),
            run_id: self.run_id(),
            config: store.config.clone(),
            logs: store.logs.iter().cloned().collect(),
            ticks: store.ticks,
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        if let Some((run_id, handle)) = self.ticker.take() {
            handle.abort();
            // A tick holding the lock right now re-checks the run id and retires
            if let Ok(mut store) = self.store.try_write() {
                store.active_run = None;
            }
            debug!("Monitor dropped, ticker for run {} cancelled", run_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::RuntimeClock;
    use chrono::TimeZone;

    fn options(seed: u64) -> MonitorOptions {
        MonitorOptions {
            rng_seed: Some(seed),
            clock: Arc::new(RuntimeClock::starting_at(
                chrono::Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap(),
            )),
            ..MonitorOptions::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_stop_idempotent() {
        let mut monitor = Monitor::with_options(BotConfig::default(), options(1));
        assert_eq!(monitor.state(), MonitorState::Stopped);

        assert!(!monitor.stop().await);
        assert_eq!(monitor.state(), MonitorState::Stopped);

        assert!(monitor.start().await);
        let run = monitor.run_id();
        assert!(!monitor.start().await);
        assert_eq!(monitor.state(), MonitorState::Running);
        assert_eq!(monitor.run_id(), run);

        assert!(monitor.stop().await);
        assert!(!monitor.stop().await);
        assert_eq!(monitor.state(), MonitorState::Stopped);
        assert_eq!(monitor.run_id(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_cycles() {
        let mut monitor = Monitor::with_options(BotConfig::default(), options(2));
        assert_eq!(monitor.toggle().await, MonitorState::Running);
        let first = monitor.run_id();
        assert_eq!(monitor.toggle().await, MonitorState::Stopped);
        assert_eq!(monitor.toggle().await, MonitorState::Running);
        assert_ne!(monitor.run_id(), first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_ticker() {
        let mut monitor = Monitor::with_options(BotConfig::default(), options(3));
        monitor.start().await;
        let store = Arc::clone(&monitor.store);
        drop(monitor);

        tokio::time::sleep(Duration::from_secs(30)).await;
        let store = store.read().await;
        assert_eq!(store.ticks, 0);
        assert_eq!(store.logs.len(), 2);
        assert_eq!(store.active_run, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_run_does_not_tick() {
        let monitor = Monitor::with_options(BotConfig::default(), options(4));
        let mut store = monitor.store.write().await;
        store.active_run = Some(Uuid::new_v4());
        assert!(!store.tick(Uuid::new_v4(), chrono::Utc::now()));
        assert_eq!(store.logs.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_clamped_and_ticks() {
        let mut monitor = Monitor::with_options(
            BotConfig::default(),
            MonitorOptions {
                tick_interval: Duration::ZERO,
                ..options(6)
            },
        );
        assert_eq!(monitor.tick_interval(), MIN_TICK_INTERVAL);

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        tokio::time::sleep(Duration::ZERO).await;

        let snapshot = monitor.snapshot().await;
        assert_eq!(snapshot.state, MonitorState::Running);
        assert!(snapshot.ticks >= 9, "ticks = {}", snapshot.ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_reflects_config() {
        let monitor = Monitor::with_options(BotConfig::default(), options(5));
        monitor
            .set_config_field(ConfigUpdate::MaxDrawdownPercent(-10.0))
            .await;
        monitor.toggle_venue("Kraken").await;

        let snapshot = monitor.snapshot().await;
        assert_eq!(snapshot.state, MonitorState::Stopped);
        assert_eq!(snapshot.config.max_drawdown_percent, -10.0);
        assert!(snapshot.config.has_venue("Kraken"));
        assert_eq!(snapshot.logs.len(), 2);
        assert_eq!(snapshot.ticks, 0);
    }
}
