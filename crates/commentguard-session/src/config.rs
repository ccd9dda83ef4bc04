//! Application configuration

use commentguard_backends::BackendConfig;
use commentguard_core::{Error, Result};
use commentguard_policy::{ModerationPolicy, Threshold};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::orchestrator::OverlapPolicy;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Moderation backend selection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Blocking thresholds
    #[serde(default)]
    pub policy: ModerationPolicy,

    /// Upper bound on one backend call, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Handling of submissions made while one is in flight
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

/// Values supplied on the command line, applied over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub threshold: Option<f64>,
    pub backend_url: Option<String>,
    pub api_key: Option<String>,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: impl AsRef<Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let config_path = config_path.as_ref();

        // Fall back to defaults when the file is absent
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)?
        } else {
            info!("Config file {} not found, using defaults", config_path.display());
            Self::default()
        };

        config.apply(overrides)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(format!("invalid config: {}", e)))
    }

    /// Apply command-line overrides
    pub fn apply(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(threshold) = overrides.threshold {
            self.policy.threshold = Threshold::new(threshold)?;
        }

        if let Some(url) = &overrides.backend_url {
            match &mut self.backend {
                BackendConfig::Completion { endpoint, .. } => *endpoint = url.clone(),
                BackendConfig::Classification { base_url } => *base_url = url.clone(),
                BackendConfig::Lexicon => {
                    return Err(Error::config("the lexicon backend does not take a URL"))
                }
            }
        }

        if let Some(key) = &overrides.api_key {
            if let BackendConfig::Completion { api_key, .. } = &mut self.backend {
                *api_key = key.clone();
            }
        }

        Ok(())
    }

    /// Check the whole configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::config("timeout_ms must be greater than zero"));
        }
        self.backend.validate()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            policy: ModerationPolicy::default(),
            timeout_ms: default_timeout_ms(),
            overlap: OverlapPolicy::default(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    15_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use commentguard_core::ToxicityCategory;
    use std::io::Write;

    #[test]
    fn test_full_config() {
        let yaml = r#"
backend:
  kind: completion
  api_key: sk-test
  model: deepseek/deepseek-r1
policy:
  threshold: 0.7
  overrides:
    threat: 0.5
timeout_ms: 5000
overlap: reject
"#;

        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.backend.kind_name(), "completion");
        assert_eq!(config.policy.threshold_for(ToxicityCategory::Threat).value(), 0.5);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.overlap, OverlapPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.policy.threshold.value(), 0.7);
        assert_eq!(config.timeout_ms, 15_000);
        assert_eq!(config.overlap, OverlapPolicy::Supersede);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("absent.yaml"), &ConfigOverrides::default())
            .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_file_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend:\n  kind: completion\npolicy:\n  threshold: 0.9").unwrap();

        let overrides = ConfigOverrides {
            threshold: Some(0.5),
            backend_url: Some("http://localhost:9999/v1/chat/completions".to_string()),
            api_key: Some("sk-cli".to_string()),
        };
        let config = AppConfig::load(file.path(), &overrides).unwrap();

        assert_eq!(config.policy.threshold.value(), 0.5);
        match config.backend {
            BackendConfig::Completion {
                endpoint, api_key, ..
            } => {
                assert_eq!(endpoint, "http://localhost:9999/v1/chat/completions");
                assert_eq!(api_key, "sk-cli");
            }
            other => panic!("unexpected backend {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AppConfig::from_yaml("policy:\n  threshold: 2.0").is_err());

        let config = AppConfig::from_yaml("timeout_ms: 0").unwrap();
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_yaml("backend:\n  kind: lexicon").unwrap();
        let overrides = ConfigOverrides {
            backend_url: Some("http://localhost".to_string()),
            ..Default::default()
        };
        assert!(config.apply(&overrides).is_err());

        let mut config = AppConfig::default();
        let overrides = ConfigOverrides {
            threshold: Some(-0.5),
            ..Default::default()
        };
        assert!(config.apply(&overrides).is_err());
    }

    #[test]
    fn test_completion_requires_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "backend:\n  kind: completion\n").unwrap();

        let err = AppConfig::load(&path, &ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
