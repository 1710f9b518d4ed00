use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::getter::{Getter, GetterError, GetterRegistry, Options};
use crate::pipeline::{Pipeline, DEFAULT_CHANNEL_CAPACITY, DEFAULT_DEADLINE};

/// Environment variable overriding `store_path`
pub const STORE_PATH_ENV: &str = "PROXYPOOL_STORE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("source #{index} ({kind}): {source}")]
    Source {
        index: usize,
        kind: String,
        #[source]
        source: GetterError,
    },
}

/// One configured source: a getter type plus its options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: Options,
}

/// Settings structure to hold the collector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds each getter may run
    pub deadline: u64,
    pub channel_capacity: usize,
    /// JSON file the pool is persisted to; in memory only when unset
    pub store_path: Option<String>,
    pub sources: Vec<SourceConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            deadline: DEFAULT_DEADLINE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            store_path: None,
            sources: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from a `.yaml`/`.yml` or `.toml` file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let settings = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        Ok(settings.with_store_override(std::env::var(STORE_PATH_ENV).ok()))
    }

    /// Replace `store_path` with `store` when it is set and non-empty
    pub fn with_store_override(mut self, store: Option<String>) -> Self {
        if let Some(store) = store.filter(|s| !s.trim().is_empty()) {
            self.store_path = Some(store.trim().to_string());
        }
        self
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline)
    }

    /// Build every configured getter, failing on the first misconfigured one
    pub fn build_getters(
        &self,
        registry: &GetterRegistry,
    ) -> Result<Vec<Arc<dyn Getter>>, ConfigError> {
        self.sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                registry
                    .build(&source.kind, &source.options)
                    .map_err(|e| ConfigError::Source {
                        index,
                        kind: source.kind.clone(),
                        source: e,
                    })
            })
            .collect()
    }

    /// A pipeline over the configured sources
    pub fn pipeline(&self, registry: &GetterRegistry) -> Result<Pipeline, ConfigError> {
        Ok(Pipeline::new(self.build_getters(registry)?)
            .deadline(self.deadline())
            .channel_capacity(self.channel_capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
deadline: 30
store_path: proxies.json
sources:
  - type: subscribe
    options:
      url: https://example.com/sub
      timeout: 10
  - type: custom
    options: { exec: ./plugin, args: "-a b" }
"#;

    #[test]
    fn test_yaml() {
        let settings = Settings::from_yaml_str(YAML).unwrap();
        assert_eq!(settings.deadline(), Duration::from_secs(30));
        assert_eq!(settings.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(settings.store_path.as_deref(), Some("proxies.json"));
        assert_eq!(settings.sources.len(), 2);
        assert_eq!(settings.sources[1].kind, "custom");

        let getters = settings
            .build_getters(&GetterRegistry::with_builtins())
            .unwrap();
        let sources: Vec<String> = getters.iter().map(|g| g.source()).collect();
        assert_eq!(
            sources,
            vec!["Subscribe(https://example.com/sub)", "Custom(./plugin -a b)"]
        );
    }

    #[test]
    fn test_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
channel_capacity = 8

[[sources]]
type = "webfuzz"
options = {{ url = "https://example.com/free" }}
"#
        )
        .unwrap();

        let settings = Settings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.deadline, DEFAULT_DEADLINE);
        assert_eq!(settings.channel_capacity, 8);
        assert!(settings.store_path.is_none());
        assert_eq!(settings.sources[0].kind, "webfuzz");
    }

    #[test]
    fn test_store_override() {
        let settings = Settings::from_yaml_str(YAML).unwrap();
        let overridden = settings
            .clone()
            .with_store_override(Some("/var/lib/proxypool/pool.json".to_string()));
        assert_eq!(
            overridden.store_path.as_deref(),
            Some("/var/lib/proxypool/pool.json")
        );

        let kept = settings.clone().with_store_override(Some(" ".to_string()));
        assert_eq!(kept.store_path.as_deref(), Some("proxies.json"));
        assert_eq!(settings.clone().with_store_override(None), settings);
    }

    #[test]
    fn test_defaults_and_errors() {
        assert_eq!(Settings::from_yaml_str("{}").unwrap(), Settings::default());

        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(matches!(
            Settings::load_from_file(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Settings::load_from_file("/nonexistent/proxypool.yaml"),
            Err(ConfigError::Io(_))
        ));

        let settings = Settings::from_yaml_str("sources: [{ type: tgchannel }]").unwrap();
        let err = settings
            .build_getters(&GetterRegistry::with_builtins())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ConfigError::Source { index: 0, source: GetterError::UnknownGetter(_), .. }
        ));
    }
}
