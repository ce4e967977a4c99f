//! Configuration loading for the symbology CLI.
//!
//! Everything is optional: a missing file or section falls back to defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use symbology::{HttpConfig, JoinPolicy};
use tracing::{debug, info};

/// Root configuration loaded from a YAML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub http: HttpConfig,
    pub placeholder: PlaceholderConfig,
    pub enhance: EnhanceConfig,
}

/// Placeholder symbology settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Background color used when a command does not pass one
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub join_policy: JoinPolicy,
}

impl CliConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: CliConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let yaml = r##"
http:
  timeout_secs: 5
  connect_timeout_secs: 2
  user_agent: "legend-bot/1.0"
placeholder:
  color: "#336699"
enhance:
  join_policy: abort
"##;
        let config: CliConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.user_agent, "legend-bot/1.0");
        assert_eq!(config.placeholder.color.as_deref(), Some("#336699"));
        assert_eq!(config.enhance.join_policy, JoinPolicy::Abort);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: CliConfig = serde_yaml::from_str("http:\n  timeout_secs: 60\n").unwrap();
        assert_eq!(config.http.timeout_secs, 60);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert!(config.placeholder.color.is_none());
        assert_eq!(config.enhance.join_policy, JoinPolicy::Degrade);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "placeholder:\n  color: red").unwrap();
        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.placeholder.color.as_deref(), Some("red"));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(CliConfig::load(Path::new("/nonexistent/symbology.yaml")).is_err());
    }
}
