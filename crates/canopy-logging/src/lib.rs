// ABOUTME: Public API for canopy logging infrastructure built on tracing
// ABOUTME: Provides centralized configuration and initialization for structured logging

pub mod config;
pub mod layers;
pub mod reload;
pub mod subscriber;


// Re-export tracing macros for convenience
pub use tracing::{Level, Span, debug, error, info, instrument, span, trace, warn};

use std::sync::OnceLock;

pub use config::{LogLevel, LoggingConfig, parse_log_level};
pub use reload::LoggingReloadHandle;
pub use subscriber::init_subscriber_with_reload;

use anyhow::Result;

/// Global reload handle for runtime log level updates
static GLOBAL_RELOAD_HANDLE: OnceLock<LoggingReloadHandle> = OnceLock::new();

/// Initialize logging with hot-reload support and store the handle globally.
pub fn init_logging_with_reload(config: LoggingConfig) -> Result<LoggingReloadHandle> {
    let handle = init_subscriber_with_reload(config)?;
    let _ = GLOBAL_RELOAD_HANDLE.set(handle.clone());
    Ok(handle)
}

fn global_handle() -> Result<&'static LoggingReloadHandle> {
    GLOBAL_RELOAD_HANDLE
        .get()
        .ok_or_else(|| anyhow::anyhow!("Logging not initialized with reload support"))
}

/// Update log level at runtime using the global reload handle.
pub fn update_log_level(level: Level) -> Result<()> {
    global_handle()?.update_log_level(level)
}

/// Update module-specific log level at runtime using the global reload handle.
pub fn update_module_level(module: &str, level: Level) -> Result<()> {
    global_handle()?.update_module_level(module, level)
}

/// Reload levels from environment variables using the global reload handle.
pub fn reload_from_env() -> Result<()> {
    global_handle()?.reload_from_env()
}
