//! Bot Monitor Library
//!
//! Simulated trading-bot monitor: a live configuration store, a bounded
//! newest-first log and a cancellable ticker that narrates the config.

pub mod clock;
pub mod config;
pub mod console;
pub mod log_buffer;
pub mod monitor;
pub mod settings;
pub mod ticker;

// Re-export main types for convenience
pub use clock::{Clock, RuntimeClock, SystemClock};
pub use config::{BotConfig, ConfigFieldError, ConfigUpdate, RiskProfile};
pub use console::{Command, CommandError, Console, Reply};
pub use log_buffer::{LogBuffer, LogLine, LOG_CAPACITY};
pub use monitor::{Monitor, MonitorOptions, MonitorSnapshot, MonitorState};
pub use settings::Settings;
