//! # Kickwire CLI
//!
//! Tails a channel's chat to stdout until interrupted.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use clap::Parser;
use kickwire_core::config::{ConfigLoader, Validatable};
use kickwire_gateway::ws::{ChannelListener, ChatClient, ChatEvent, ClientConfig};
use kickwire_telemetry::logging::{LogConfig, LogFormat, init_logging};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const ENV_PREFIX: &str = "KICKWIRE";

/// Kickwire - follow a channel's live chat
#[derive(Parser, Debug)]
#[command(name = "kickwire")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Channel to follow; overrides the config file and KICKWIRE_CHANNEL
    channel: Option<String>,

    /// Configuration file path (yaml, toml, or json)
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log format (json, pretty)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    load_config_with(cli, &|name| std::env::var(name).ok())
}

/// Layers the config file, then `lookup` overrides, then the CLI arguments.
fn load_config_with(cli: &Cli, lookup: &dyn Fn(&str) -> Option<String>) -> Result<ClientConfig> {
    let loader = ConfigLoader::new()
        .with_env_prefix(ENV_PREFIX)
        .with_validation(false);

    let config = match &cli.config {
        Some(path) => loader
            .load_file(path)
            .with_context(|| format!("failed to load {path}"))?,
        None => ClientConfig::default(),
    };
    let mut config = loader.finish_with(config, lookup)?;

    if let Some(channel) = &cli.channel {
        config.channel.clone_from(channel);
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::default()
        .with_level(if cli.verbose { "debug" } else { "info" })
        .with_format(cli.log_format);
    let _guards = init_logging(&log_config)?;

    let config = load_config(&cli)?;
    let channel = config.channel.clone();

    let (listener, mut events) = ChannelListener::new(256);
    let client = ChatClient::new(config)?.with_listener(listener);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, shutting down");
            }
            cancel.cancel();
        }
    });

    info!(channel = %channel, "Following chat");
    let connection = tokio::spawn(async move { client.connect(cancel).await });

    // The client owns the sender, so this ends when `connect` returns.
    while let Some(event) = events.recv().await {
        match event {
            ChatEvent::Message(message) => println!(
                "[{}] {}: {}",
                message.channel, message.sender.username, message.content
            ),
            ChatEvent::Error(error) => warn!(error = %error, "Connection problem"),
        }
    }

    connection
        .await?
        .with_context(|| format!("failed to follow channel '{channel}'"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["kickwire", "xqc"]).unwrap();
        assert_eq!(cli.channel.as_deref(), Some("xqc"));
        assert_eq!(cli.log_format, LogFormat::Pretty);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "kickwire",
            "--config",
            "kickwire.yaml",
            "--verbose",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.channel, None);
        assert_eq!(cli.config.as_deref(), Some("kickwire.yaml"));
        assert!(cli.verbose);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["kickwire", "xqc", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn test_defaults_without_overrides() {
        let cli = Cli::try_parse_from(["kickwire", "xqc"]).unwrap();
        let config = load_config_with(&cli, &|_| None).unwrap();
        assert_eq!(config.channel, "xqc");
        assert_eq!(config.cluster, ClientConfig::default().cluster);
        assert_eq!(
            config.heartbeat_interval_ms,
            ClientConfig::default().heartbeat_interval_ms
        );
    }

    #[test]
    fn test_cli_channel_wins_over_env() {
        let cli = Cli::try_parse_from(["kickwire", "xqc"]).unwrap();
        let lookup = |name: &str| match name {
            "KICKWIRE_CHANNEL" => Some("from-env".to_string()),
            "KICKWIRE_CLUSTER" => Some("eu1".to_string()),
            _ => None,
        };
        let config = load_config_with(&cli, &lookup).unwrap();
        assert_eq!(config.channel, "xqc");
        assert_eq!(config.cluster, "eu1");
    }

    #[test]
    fn test_missing_channel_is_rejected() {
        let cli = Cli::try_parse_from(["kickwire"]).unwrap();
        assert!(load_config_with(&cli, &|_| None).is_err());
    }
}
