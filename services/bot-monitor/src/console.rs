//! Line-oriented operator console
//!
//! Renders the monitor's config, log and activity state and maps text
//! commands onto monitor operations. News and insight requests run as
//! detached one-shot tasks so the console stays responsive.

use std::str::FromStr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

use market_insight::fixtures;
use market_insight::{MarketIntel, NewsItem};

use crate::config::{ConfigFieldError, ConfigUpdate, AVAILABLE_VENUES, PRIMARY_PAIRS};
use crate::monitor::{Monitor, MonitorState};

pub const HELP: &str = "\
commands:
  start | stop | toggle        control the monitor
  venue <name>                 toggle a target venue
  set <field> <value>          fields: name, risk, pair, drawdown, auto_trade
  logs [n]                     newest n log lines (all by default)
  status                       activity and configuration
  venues | pairs               catalogues
  market                       fixture quotes and investments
  news                         fetch headlines in the background
  insight                      fetch a market insight in the background
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Stop,
    Toggle,
    Venue(String),
    Set(ConfigUpdate),
    Logs(Option<usize>),
    Status,
    Venues,
    Pairs,
    Market,
    News,
    Insight,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Field(#[from] ConfigFieldError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "toggle" => Ok(Command::Toggle),
            "venue" if rest.is_empty() => Err(CommandError::Usage("venue <name>")),
            "venue" => Ok(Command::Venue(rest.to_string())),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage("set <field> <value>"))?;
                Ok(Command::Set(ConfigUpdate::parse(field, value.trim())?))
            }
            "logs" if rest.is_empty() => Ok(Command::Logs(None)),
            "logs" => rest
                .parse()
                .map(|n| Command::Logs(Some(n)))
                .map_err(|_| CommandError::Usage("logs [n]")),
            "status" => Ok(Command::Status),
            "venues" => Ok(Command::Venues),
            "pairs" => Ok(Command::Pairs),
            "market" => Ok(Command::Market),
            "news" => Ok(Command::News),
            "insight" => Ok(Command::Insight),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Result of handling one command
pub enum Reply {
    Lines(Vec<String>),
    /// Output of a detached request, printed when it completes
    Background(JoinHandle<Vec<String>>),
    Quit,
}

pub struct Console {
    monitor: Monitor,
    intel: Arc<dyn MarketIntel>,
}

impl Console {
    pub fn new(monitor: Monitor, intel: Arc<dyn MarketIntel>) -> Self {
        Self { monitor, intel }
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub async fn handle(&mut self, command: Command) -> Reply {
        debug!("Console command: {:?}", command);

        match command {
            Command::Start => {
                let line = if self.monitor.start().await {
                    "Algorithm activated."
                } else {
                    "Already running."
                };
                Reply::Lines(vec![line.to_string()])
            }
            Command::Stop => {
                let line = if self.monitor.stop().await {
                    "Activities halted."
                } else {
                    "Already on standby."
                };
                Reply::Lines(vec![line.to_string()])
            }
            Command::Toggle => {
                let line = match self.monitor.toggle().await {
                    MonitorState::Running => "Algorithm activated.",
                    MonitorState::Stopped => "Activities halted.",
                };
                Reply::Lines(vec![line.to_string()])
            }
            Command::Venue(name) => {
                let line = if self.monitor.toggle_venue(&name).await {
                    format!("● {} targeted", name)
                } else {
                    format!("○ {} released", name)
                };
                Reply::Lines(vec![line])
            }
            Command::Set(update) => {
                self.monitor.set_config_field(update).await;
                Reply::Lines(self.status_lines().await)
            }
            Command::Logs(limit) => {
                let logs = self.monitor.logs().await;
                let n = limit.unwrap_or(logs.len());
                Reply::Lines(logs.into_iter().take(n).map(|l| format!("# {}", l)).collect())
            }
            Command::Status => Reply::Lines(self.status_lines().await),
            Command::Venues => {
                let config = self.monitor.config().await;
                Reply::Lines(
                    AVAILABLE_VENUES
                        .iter()
                        .map(|v| format!("{} {}", if config.has_venue(v) { "●" } else { "○" }, v))
                        .collect(),
                )
            }
            Command::Pairs => {
                let config = self.monitor.config().await;
                Reply::Lines(
                    PRIMARY_PAIRS
                        .iter()
                        .map(|p| format!("{} {}", if config.primary_pair == *p { "●" } else { "○" }, p))
                        .collect(),
                )
            }
            Command::Market => Reply::Lines(market_lines()),
            Command::News => {
                let intel = Arc::clone(&self.intel);
                Reply::Background(tokio::spawn(async move {
                    let items = intel.fetch_news().await;
                    news_lines(&items)
                }))
            }
            Command::Insight => {
                let intel = Arc::clone(&self.intel);
                let summary = fixtures::market_summary(&fixtures::currencies());
                Reply::Background(tokio::spawn(async move {
                    let insight = intel.get_insight(&summary).await;
                    vec![format!("AI insight: \"{}\"", insight)]
                }))
            }
            Command::Help => Reply::Lines(HELP.lines().map(str::to_string).collect()),
            Command::Quit => Reply::Quit,
        }
    }

    /// Stop the monitor before exit
    pub async fn shutdown(&mut self) {
        self.monitor.stop().await;
    }

    async fn status_lines(&self) -> Vec<String> {
        let snapshot = self.monitor.snapshot().await;
        let config = &snapshot.config;
        let state = match snapshot.state {
            MonitorState::Running => "SYSTEM OPERATING",
            MonitorState::Stopped => "MODULE ON STANDBY",
        };

        let mut lines = vec![format!("{} ({} ticks)", state, snapshot.ticks)];
        if let Some(run_id) = snapshot.run_id {
            lines.push(format!("run:          {}", run_id));
        }
        lines.push(format!("name:         {}", config.name));
        lines.push(format!("pair:         {}", config.primary_pair));
        lines.push(format!("risk:         {}", config.risk_profile));
        lines.push(format!("venues:       {}", config.target_venues.join(", ")));
        lines.push(format!("auto_trade:   {}", config.auto_trade_enabled));
        lines.push(format!("max drawdown: {}%", config.max_drawdown_percent));
        lines
    }
}

fn market_lines() -> Vec<String> {
    let mut lines: Vec<String> = fixtures::currencies()
        .iter()
        .map(|q| format!("{:<8} {:>10} {:+.2}% {:?}", q.symbol, q.price, q.change_pct, q.trend))
        .collect();
    lines.extend(fixtures::investments().iter().map(|i| {
        format!(
            "{:<26} {:<14} YTD {:>5.2}% risk {:?} min {}",
            i.name, i.kind, i.return_ytd_pct, i.risk, i.min_investment
        )
    }));
    lines
}

fn news_lines(items: &[NewsItem]) -> Vec<String> {
    if items.is_empty() {
        return vec!["No news available.".to_string()];
    }
    items
        .iter()
        .map(|n| format!("[{}] {} ({}, {})", n.category, n.title, n.source, n.timestamp))
        .collect()
}
