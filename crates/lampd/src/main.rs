//! lampd - status lamp daemon.
//!
//! Connects to a status stream over a resilient WebSocket link and mirrors
//! overall health on an indicator lamp.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lamp_link::{ConnectionManager, LinkEvent, WsTransport};
use lamp_proto::StreamMessage;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lampd::config::{IndicatorDriver, LampConfig};
use lampd::error::LampError;
use lampd::indicator::{ConsoleIndicator, Indicator, LampColor, LampController, SerialIndicator};
use lampd::rules::{self, StatusSnapshot};

#[derive(Parser)]
#[command(name = "lampd")]
#[command(about = "Status lamp daemon")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daemon
    Run {
        /// Path to config file
        #[arg(short, long, default_value = "/etc/lampd/config.toml")]
        config: PathBuf,
    },

    /// Generate a sample config file
    InitConfig {
        /// Path to write config
        #[arg(short, long, default_value = "/etc/lampd/config.toml")]
        output: PathBuf,
    },

    /// Drive the indicator once, for installation checks
    SetColor {
        /// Color to show (off, red, amber, green, blue, white)
        color: LampColor,

        /// Path to config file
        #[arg(short, long, default_value = "/etc/lampd/config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("lampd=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            run_daemon(config).await?;
        }

        Commands::InitConfig { output } => {
            init_config(&output)?;
        }

        Commands::SetColor { color, config } => {
            let config = LampConfig::from_file(&config)?;
            let mut lamp = build_indicator(&config)?;
            lamp.set_color(color)?;
            info!(color = %color, "indicator set");
        }
    }

    Ok(())
}

fn build_indicator(config: &LampConfig) -> Result<Box<dyn Indicator>, LampError> {
    match config.indicator.driver {
        IndicatorDriver::Console => Ok(Box::new(ConsoleIndicator::new())),
        IndicatorDriver::Serial => {
            let device = config
                .indicator
                .device
                .as_ref()
                .ok_or_else(|| LampError::Config("indicator.device is required".to_string()))?;
            Ok(Box::new(SerialIndicator::open(device)?))
        }
    }
}

fn init_config(output: &PathBuf) -> anyhow::Result<()> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, LampConfig::sample().to_toml()?)?;
    info!(path = %output.display(), "wrote sample config");
    Ok(())
}

async fn run_daemon(config_path: PathBuf) -> anyhow::Result<()> {
    info!(config = %config_path.display(), "starting lampd");

    let config = LampConfig::from_file(&config_path)?;
    info!(
        stream = %config.stream_url,
        driver = ?config.indicator.driver,
        "loaded config"
    );

    let mut lamp = LampController::new(build_indicator(&config)?);

    let mut manager = ConnectionManager::new(config.link_config(), WsTransport)?;
    let mut events = manager.subscribe();
    let handle = manager.handle();
    tokio::spawn(manager.run());

    handle.activate().await;
    lamp.show(LampColor::Blue)?;

    let mut snapshot = StatusSnapshot::new();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(LinkEvent::Opened) => {
                    info!("stream connected");
                    lamp.show(rules::color_for(&snapshot))?;
                }
                Some(LinkEvent::Message(frame)) => match StreamMessage::from_json(&frame) {
                    Ok(message) => {
                        snapshot.apply(&message);
                        lamp.show(rules::color_for(&snapshot))?;
                    }
                    Err(e) => {
                        warn!(error = %e, "dropping undecodable frame");
                    }
                },
                Some(LinkEvent::Closed { code, reason }) => {
                    warn!(?code, %reason, "stream disconnected");
                    lamp.show(LampColor::Blue)?;
                }
                Some(LinkEvent::Error(err)) => {
                    error!(error = %err, "stream error");
                    lamp.show(LampColor::Blue)?;
                }
                None => break,
            },

            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                handle.deactivate().await;
                lamp.show(LampColor::Off)?;
                break;
            }
        }
    }

    Ok(())
}
