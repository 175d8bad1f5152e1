//! Bot Monitor - operator console for the simulated trading bot
//!
//! 1. Loads settings (defaults, `monitor.*` file, `MONITOR_*` env)
//! 2. Seeds the bot config from a preset when one is found
//! 3. Reads commands from stdin and drives the monitor loop
//! 4. Stops the ticker on quit, EOF or Ctrl-C

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use bot_monitor::{Command, Console, Monitor, MonitorOptions, Reply, Settings, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Bot Monitor...");

    let settings = Settings::load()?;
    let bot_config = settings.initial_bot_config()?;
    info!(
        "Bot '{}', tick every {}ms, seed {:?}",
        bot_config.name, settings.tick_interval_ms, settings.rng_seed
    );

    let monitor = Monitor::with_options(
        bot_config,
        MonitorOptions {
            tick_interval: settings.tick_interval(),
            rng_seed: settings.rng_seed,
            clock: Arc::new(SystemClock),
        },
    );

    let intel = market_insight::intel_for(
        settings.insight.api_key.as_deref(),
        &settings.insight.base_url,
        &settings.insight.model,
        settings.insight.timeout_secs,
    );
    info!("Market intel source: {}", intel.name());

    let mut console = Console::new(monitor, intel);
    println!("{}", bot_monitor::console::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("stdin closed");
                        break;
                    }
                    Err(e) => {
                        warn!("stdin read error: {}", e);
                        break;
                    }
                };

                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(bot_monitor::CommandError::Empty) => continue,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };

                match console.handle(command).await {
                    Reply::Lines(lines) => {
                        for line in lines {
                            println!("{}", line);
                        }
                    }
                    Reply::Background(handle) => {
                        tokio::spawn(async move {
                            match handle.await {
                                Ok(lines) => lines.iter().for_each(|l| println!("{}", l)),
                                Err(e) => warn!("Background request failed: {}", e),
                            }
                        });
                    }
                    Reply::Quit => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    console.shutdown().await;
    info!("Bot Monitor stopped");
    Ok(())
}
