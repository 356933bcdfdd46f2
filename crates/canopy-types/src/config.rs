// ABOUTME: Navigator configuration types loaded from TOML
// ABOUTME: Locale, label and palette sizing settings with validation and sanitizing

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading navigator configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level navigator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Locale used to resolve `<id>.<locale>` language files
    pub locale: String,

    /// Id prefix of the shared LG file every regular dialog shows
    pub common_lg_prefix: String,

    /// Label of the synthetic solution root
    pub solution_label: String,

    pub quick: QuickConfig,

    pub tree: TreeConfig,
}

/// Quick search palette settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickConfig {
    /// Upper bound on returned results
    pub max_results: usize,

    /// Rows shown before the result list scrolls
    pub visible_rows: usize,

    /// Favor matches at the start of a field
    pub prefer_prefix: bool,
}

/// Tree presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Row height in pixels, used to size breadcrumb callouts
    pub item_height: u32,

    /// Maximum callout height in pixels
    pub max_callout_height: u32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            locale: "en-us".to_string(),
            common_lg_prefix: "common".to_string(),
            solution_label: "Solution".to_string(),
            quick: QuickConfig::default(),
            tree: TreeConfig::default(),
        }
    }
}

impl Default for QuickConfig {
    fn default() -> Self {
        Self {
            max_results: 100,
            visible_rows: 15,
            prefer_prefix: true,
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            item_height: 24,
            max_callout_height: 300,
        }
    }
}

impl NavigatorConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locale.trim().is_empty() {
            return Err(ConfigError::Invalid("locale cannot be empty".to_string()));
        }

        if self.quick.max_results == 0 {
            return Err(ConfigError::Invalid(
                "quick.max_results must be greater than zero".to_string(),
            ));
        }

        if self.tree.item_height == 0 {
            return Err(ConfigError::Invalid(
                "tree.item_height must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Get a sanitized copy with out-of-range values clamped
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();

        config.locale = config.locale.trim().to_lowercase();
        if config.locale.is_empty() {
            config.locale = "en-us".to_string();
        }

        config.quick.max_results = config.quick.max_results.clamp(1, 1000);
        config.quick.visible_rows = config.quick.visible_rows.clamp(1, 50);
        config.tree.item_height = config.tree.item_height.max(1);

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = NavigatorConfig::default();
        assert_eq!(config.locale, "en-us");
        assert_eq!(config.solution_label, "Solution");
        assert_eq!(config.quick.visible_rows, 15);
        assert_eq!(config.tree.item_height, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = NavigatorConfig::from_toml(
            r#"
            locale = "fr-fr"

            [quick]
            max_results = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.locale, "fr-fr");
        assert_eq!(config.quick.max_results, 20);
        assert_eq!(config.quick.visible_rows, 15);
        assert_eq!(config.common_lg_prefix, "common");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = NavigatorConfig::from_toml("locale = \"\"");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = NavigatorConfig::from_toml("locale = [");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_sanitized_clamps_values() {
        let mut config = NavigatorConfig::default();
        config.locale = "  EN-GB ".to_string();
        config.quick.max_results = 0;
        config.quick.visible_rows = 500;

        let sanitized = config.sanitized();
        assert_eq!(sanitized.locale, "en-gb");
        assert_eq!(sanitized.quick.max_results, 1);
        assert_eq!(sanitized.quick.visible_rows, 50);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "solution_label = \"Workspace\"").unwrap();

        let config = NavigatorConfig::load(file.path()).unwrap();
        assert_eq!(config.solution_label, "Workspace");

        let missing = NavigatorConfig::load(Path::new("/nonexistent/canopy.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
