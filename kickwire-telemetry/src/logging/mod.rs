//! Structured logging for Kickwire.
//!
//! Provides configurable logging with support for:
//! - JSON and pretty-print formats
//! - Multiple output targets (stdout, file)
//! - Log rotation

mod config;

pub use config::{LogConfig, LogFormat, LogOutput, RotationConfig};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const LOG_FILE_NAME: &str = "kickwire.log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Initialize the logging system with the given configuration.
///
/// Returns guards that must be kept alive for the duration of the program
/// to ensure all logs are flushed.
///
/// # Example
///
/// ```no_run
/// use kickwire_telemetry::logging::{init_logging, LogConfig};
///
/// let config = LogConfig::default();
/// let _guards = init_logging(&config).expect("Failed to initialize logging");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<Vec<WorkerGuard>, LoggingError> {
    let env_filter = build_filter(config)?;
    let (layers, guards) = build_layers(config)?;

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(guards)
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| {
        LoggingError::InvalidConfig(format!("invalid level '{}': {e}", config.level))
    })
}

fn build_layers<S>(config: &LogConfig) -> Result<(Vec<BoxedLayer<S>>, Vec<WorkerGuard>), LoggingError>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    if config.outputs.is_empty() {
        return Err(LoggingError::InvalidConfig(
            "at least one output is required".to_string(),
        ));
    }

    let mut layers = Vec::with_capacity(config.outputs.len());
    let mut guards = Vec::new();

    for output in &config.outputs {
        match output {
            LogOutput::Stdout => layers.push(fmt_layer(config, std::io::stdout, true)),
            LogOutput::File { path, rotation } => {
                std::fs::create_dir_all(path)?;
                let appender = file_appender(Path::new(path), rotation.unwrap_or(RotationConfig::Daily));
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                layers.push(fmt_layer(config, non_blocking, false));
                guards.push(guard);
            }
        }
    }

    Ok((layers, guards))
}

fn file_appender(dir: &Path, rotation: RotationConfig) -> tracing_appender::rolling::RollingFileAppender {
    match rotation {
        RotationConfig::Hourly => tracing_appender::rolling::hourly(dir, LOG_FILE_NAME),
        RotationConfig::Daily => tracing_appender::rolling::daily(dir, LOG_FILE_NAME),
        RotationConfig::Never => tracing_appender::rolling::never(dir, LOG_FILE_NAME),
    }
}

fn fmt_layer<S, W>(config: &LogConfig, writer: W, ansi: bool) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(config.include_thread_id)
        .with_file(config.include_file_info)
        .with_line_number(config.include_file_info)
        .with_span_events(if config.include_span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        });

    match config.format {
        LogFormat::Json => base.json().flatten_event(true).boxed(),
        LogFormat::Pretty => base.with_ansi(ansi).pretty().boxed(),
    }
}

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory: {0}")]
    DirectoryCreation(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid logging configuration: {0}")]
    InvalidConfig(String),

    /// A global subscriber is already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}
