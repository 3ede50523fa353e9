//! Seekbar tunables
//!
//! Three knobs cover everything the seekbar exposes: the contrast exponent
//! applied to normalized loudness, and the retry budget for analysis
//! fetches. Defaults are compiled in; a YAML file in the user's config
//! directory can override them.
//! Default location: ~/.config/ripple/seekbar.yaml

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::fetch::RetryPolicy;

/// Seekbar configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekbarConfig {
    /// Exponent applied to normalized loudness (higher = more contrast)
    pub contrast_factor: f64,
    /// Maximum analysis fetch attempts per track
    pub max_attempts: u32,
    /// Fixed pause between fetch attempts, in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for SeekbarConfig {
    fn default() -> Self {
        Self {
            contrast_factor: 4.0,
            max_attempts: 3,
            retry_delay_ms: 2000,
        }
    }
}

impl SeekbarConfig {
    /// Retry policy for the analysis fetcher
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/ripple/seekbar.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("ripple")
        .join("seekbar.yaml")
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns defaults. If it exists but is
/// invalid, logs a warning and returns defaults.
pub fn load_config(path: &Path) -> SeekbarConfig {
    if !path.exists() {
        log::info!("load_config: no config at {:?}, using defaults", path);
        return SeekbarConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<SeekbarConfig>(&contents) {
            Ok(config) => {
                log::info!("load_config: loaded {:?}: {:?}", path, config);
                config
            }
            Err(e) => {
                log::warn!("load_config: failed to parse config: {}, using defaults", e);
                SeekbarConfig::default()
            }
        },
        Err(e) => {
            log::warn!("load_config: failed to read config file: {}, using defaults", e);
            SeekbarConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_tunables() {
        let config = SeekbarConfig::default();
        assert_eq!(config.contrast_factor, 4.0);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay_ms, 2000);

        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = SeekbarConfig {
            contrast_factor: 2.5,
            max_attempts: 5,
            retry_delay_ms: 500,
        };

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: SeekbarConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let parsed: SeekbarConfig = serde_yaml::from_str("max_attempts: 1\n").unwrap();
        assert_eq!(parsed.max_attempts, 1);
        assert_eq!(parsed.contrast_factor, 4.0);
        assert_eq!(parsed.retry_delay_ms, 2000);
    }
}
