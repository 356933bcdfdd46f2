// ABOUTME: Tracing subscriber initialization and layer composition
// ABOUTME: Stacks a reloadable level filter under every configured output layer

use anyhow::{Context, Result};
use tracing_subscriber::{prelude::*, reload, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::layers::{create_env_filter, create_output_layers};
use crate::reload::LoggingReloadHandle;

/// Initialize the global tracing subscriber with hot-reload support.
///
/// Returns a LoggingReloadHandle that can be used to update log levels at runtime.
pub fn init_subscriber_with_reload(config: LoggingConfig) -> Result<LoggingReloadHandle> {
    let env_filter = create_env_filter(&config).context("Failed to create environment filter")?;
    let (filter_layer, filter_handle) = reload::Layer::new(env_filter);
    let output_layers = create_output_layers(&config)?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(output_layers)
        .try_init()
        .context("Failed to install global subscriber")?;

    log_initialized(&config);
    Ok(LoggingReloadHandle::new(filter_handle, config))
}

fn log_initialized(config: &LoggingConfig) {
    tracing::info!(
        log_level = %config.level.0,
        console_output = config.output.console,
        file_output = config.output.file,
        json_output = config.output.json,
        file_path = %config.file.path.display(),
        "Canopy logging initialized"
    );
}
