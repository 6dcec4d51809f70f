//! Log output for applications embedding the dispatcher.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// How [`init_telemetry_with_config`] formats and filters events.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Filter used when `RUST_LOG` is unset (e.g. "info", "pacer_rest=debug")
    pub log_level: String,
    /// Emit one JSON object per event instead of human-readable lines
    pub json_logs: bool,
}

impl TelemetryConfig {
    /// Set the fallback filter.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Install a global fmt subscriber filtered by `RUST_LOG`.
///
/// # Errors
///
/// Returns error if a global subscriber is already set.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    init_telemetry_with_config(TelemetryConfig::default())
}

/// Install a global fmt subscriber configured by `config`.
///
/// `RUST_LOG` still takes precedence over `config.log_level`.
///
/// # Errors
///
/// Returns error if the fallback filter does not parse or a global
/// subscriber is already set.
pub fn init_telemetry_with_config(
    config: TelemetryConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
