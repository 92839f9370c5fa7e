//! Tracing subscriber setup.
//!
//! Logs always go to stderr so they never interleave with the chat on stdout.

use crate::config::LogFormat;
use crate::error::AppError;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

const APP_NAME: &str = "intentbot";

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing(format: LogFormat) -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|e| AppError::Internal(format!("Failed to install subscriber: {}", e))),
        LogFormat::Json => {
            let formatting_layer = BunyanFormattingLayer::new(APP_NAME.into(), std::io::stderr);
            let subscriber = Registry::default()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(formatting_layer);
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| AppError::Internal(format!("Failed to install subscriber: {}", e)))
        }
    }
}
