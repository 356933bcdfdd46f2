// ABOUTME: Runtime log level reloading and configuration updates
// ABOUTME: Swaps the level filter without rebuilding the output layers

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Registry, reload};

use crate::config::LoggingConfig;
use crate::layers::create_env_filter;

/// Handle for updating log configuration at runtime
#[derive(Clone)]
pub struct LoggingReloadHandle {
    filter_handle: reload::Handle<EnvFilter, Registry>,
    current_config: Arc<RwLock<LoggingConfig>>,
}

impl LoggingReloadHandle {
    pub fn new(filter_handle: reload::Handle<EnvFilter, Registry>, config: LoggingConfig) -> Self {
        Self {
            filter_handle,
            current_config: Arc::new(RwLock::new(config)),
        }
    }

    /// Update the global log level
    pub fn update_log_level(&self, level: tracing::Level) -> Result<()> {
        self.apply(|config| config.level = level.into())?;
        tracing::info!(new_level = %level, "Log level updated at runtime");
        Ok(())
    }

    /// Update a single module's log level
    pub fn update_module_level(&self, module: &str, level: tracing::Level) -> Result<()> {
        self.apply(|config| {
            config
                .module_levels
                .insert(module.to_string(), level.into());
        })?;
        tracing::info!(module = %module, new_level = %level, "Module log level updated at runtime");
        Ok(())
    }

    /// Re-read levels from the environment, keeping output and file settings
    pub fn reload_from_env(&self) -> Result<()> {
        let from_env =
            LoggingConfig::from_env().context("Failed to load configuration from environment")?;
        self.apply(|config| {
            config.level = from_env.level;
            config.module_levels = from_env.module_levels.clone();
        })?;
        tracing::info!(
            level = %from_env.level.0,
            module_count = from_env.module_levels.len(),
            "Logging configuration reloaded from environment"
        );
        Ok(())
    }

    pub fn current_config(&self) -> LoggingConfig {
        self.current_config.read().clone()
    }

    /// Mutate the stored config and push the resulting filter. The stored
    /// config is left untouched if the filter cannot be rebuilt.
    fn apply(&self, change: impl FnOnce(&mut LoggingConfig)) -> Result<()> {
        let mut config = self.current_config.write();
        let mut updated = config.clone();
        change(&mut updated);

        let new_filter =
            create_env_filter(&updated).context("Failed to create new environment filter")?;
        self.filter_handle
            .reload(new_filter)
            .context("Failed to reload log filter")?;

        *config = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_updates_are_recorded() {
        let config = LoggingConfig::default();
        let filter = create_env_filter(&config).unwrap();
        let (_layer, handle) = reload::Layer::<EnvFilter, Registry>::new(filter);

        let reload = LoggingReloadHandle::new(handle, config);
        reload.update_log_level(Level::DEBUG).unwrap();
        reload.update_module_level("canopy_quick", Level::TRACE).unwrap();

        let current = reload.current_config();
        assert_eq!(current.level.0, Level::DEBUG);
        assert_eq!(
            current.module_levels.get("canopy_quick").map(|l| l.0),
            Some(Level::TRACE)
        );
    }
}
