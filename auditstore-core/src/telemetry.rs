//! Tracing subscriber setup.
//!
//! The store layers only emit `tracing` events; binaries and test harnesses
//! call [`init_tracing`] once at startup to route them somewhere.

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "auditstore=debug,info";

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive string
    pub log_filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Service name attached to the startup event
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: std::env::var("AUDITSTORE_LOG_FILTER")
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            json: std::env::var("AUDITSTORE_LOG_JSON")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
            service_name: std::env::var("AUDITSTORE_SERVICE_NAME")
                .unwrap_or_else(|_| "auditstore".to_string()),
        }
    }
}

impl TelemetryConfig {
    /// Set the filter directive.
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Enable or disable JSON output.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Set the service name.
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }
}

/// Errors from subscriber initialization.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid log filter `{filter}`: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to init subscriber: {reason}")]
    InitFailed { reason: String },
}

/// Install the global tracing subscriber.
///
/// Fails instead of panicking when a global subscriber is already set.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_new(&config.log_filter).map_err(|e| TelemetryError::InvalidFilter {
            filter: config.log_filter.clone(),
            reason: e.to_string(),
        })?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    result.map_err(|e| TelemetryError::InitFailed {
        reason: e.to_string(),
    })?;

    tracing::info!(
        service_name = config.service_name,
        json = config.json,
        log_filter = config.log_filter,
        "Telemetry initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = TelemetryConfig::default()
            .with_log_filter("warn")
            .with_json(true)
            .with_service_name("inventory");
        assert_eq!(config.log_filter, "warn");
        assert!(config.json);
        assert_eq!(config.service_name, "inventory");
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let config = TelemetryConfig::default().with_log_filter("auditstore=notalevel");
        let err = init_tracing(&config).unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
    }

    #[test]
    fn test_second_init_fails_without_panicking() {
        let config = TelemetryConfig::default().with_log_filter("off");
        let _ = init_tracing(&config);
        let second = init_tracing(&config);
        assert!(matches!(second, Err(TelemetryError::InitFailed { .. })));
    }
}
