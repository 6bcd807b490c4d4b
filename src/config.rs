//! Layered configuration: defaults, TOML file, environment.

use crate::seo::describer::{FirstPhrase, PhraseSelector, RandomPhrase};
use crate::seo::generator::{GeneratorOptions, DEFAULT_MAX_BATCH_ITEMS};
use crate::seo::preprocess::DEFAULT_PREVIEW_LENGTH;
use crate::seo::types::{Tone, DEFAULT_MAX_LENGTH, MAX_MAX_LENGTH, MIN_MAX_LENGTH};
use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Prefix of environment overrides, e.g. `WPMETA_SERVER__BIND_ADDR`
pub const ENV_PREFIX: &str = "WPMETA";

/// Files tried when no explicit path is given
const DEFAULT_CONFIG_FILES: &[&str] = &["wp-meta.toml", "config/wp-meta.toml"];

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
}

/// Which transport the binary serves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// MCP JSON-RPC over stdin/stdout
    #[default]
    Stdio,
    /// HTTP API for the WordPress admin panel
    Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub transport: Transport,
    pub bind_addr: String,
    /// API key required by the HTTP transport; generated at startup when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            transport: Transport::Stdio,
            bind_addr: "0.0.0.0:3000".to_string(),
            api_key: None,
        }
    }
}

/// How tone templates pick their lead phrase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseSelection {
    #[default]
    First,
    Random,
}

impl PhraseSelection {
    pub fn selector(&self) -> Arc<dyn PhraseSelector> {
        match self {
            PhraseSelection::First => Arc::new(FirstPhrase),
            PhraseSelection::Random => Arc::new(RandomPhrase),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub default_tone: Tone,
    pub default_max_length: usize,
    pub preview_length: usize,
    pub phrase_selection: PhraseSelection,
    pub max_batch_items: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_tone: Tone::Professional,
            default_max_length: DEFAULT_MAX_LENGTH,
            preview_length: DEFAULT_PREVIEW_LENGTH,
            phrase_selection: PhraseSelection::First,
            max_batch_items: DEFAULT_MAX_BATCH_ITEMS,
        }
    }
}

impl GeneratorConfig {
    pub fn to_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            preview_length: self.preview_length,
            max_batch_items: self.max_batch_items,
            selector: self.phrase_selection.selector(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    /// daily, hourly or never
    pub rotation: String,
    pub console: bool,
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            rotation: "daily".to_string(),
            console: true,
            file: false,
        }
    }
}

impl AppConfig {
    /// Check cross-field constraints the types cannot express
    pub fn validate(&self) -> crate::Result<()> {
        let generator = &self.generator;
        if !(MIN_MAX_LENGTH..=MAX_MAX_LENGTH).contains(&generator.default_max_length) {
            return Err(crate::Error::Config(format!(
                "generator.default_max_length must be between {} and {}",
                MIN_MAX_LENGTH, MAX_MAX_LENGTH
            )));
        }
        if generator.preview_length == 0 {
            return Err(crate::Error::Config(
                "generator.preview_length must be positive".to_string(),
            ));
        }
        if generator.max_batch_items == 0 {
            return Err(crate::Error::Config(
                "generator.max_batch_items must be positive".to_string(),
            ));
        }
        self.bind_socket_addr()?;
        Ok(())
    }

    pub fn bind_socket_addr(&self) -> crate::Result<SocketAddr> {
        self.server.bind_addr.parse().map_err(|e| {
            crate::Error::Config(format!(
                "invalid server.bind_addr '{}': {}",
                self.server.bind_addr, e
            ))
        })
    }

    /// Honor the `PORT` and `MCP_API_KEY` variables the admin plugin documents
    pub fn apply_legacy_overrides(&mut self, port: Option<String>, api_key: Option<String>) {
        if let Some(port) = port.and_then(|p| p.trim().parse::<u16>().ok()) {
            match self.server.bind_addr.parse::<SocketAddr>() {
                Ok(mut addr) => {
                    addr.set_port(port);
                    self.server.bind_addr = addr.to_string();
                }
                Err(_) => self.server.bind_addr = format!("0.0.0.0:{}", port),
            }
        }
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.server.api_key = Some(key);
        }
    }

    /// Commented sample configuration file
    pub fn sample_toml() -> Result<String> {
        let body = toml::to_string_pretty(&AppConfig::default())
            .context("Failed to render sample configuration")?;
        Ok(format!(
            r#"# wp-meta-rs configuration
#
# Save as wp-meta.toml (or config/wp-meta.toml).
# Every key can be overridden from the environment, e.g.
#   WPMETA_SERVER__TRANSPORT=http
#   WPMETA_SERVER__BIND_ADDR=0.0.0.0:3000
#   WPMETA_GENERATOR__PHRASE_SELECTION=random
# PORT and MCP_API_KEY are also honored.
#
# server.api_key protects the HTTP API; leave it unset to have one generated
# at startup.

{}"#,
            body
        ))
    }
}

/// Configuration loader with builder pattern
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    load_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from an explicit file (must exist)
    pub fn with_file(mut self, path: Option<impl AsRef<Path>>) -> Self {
        self.config_file = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    /// Layer `WPMETA_*`, `PORT` and `MCP_API_KEY` on top
    pub fn load_from_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<AppConfig> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        match &self.config_file {
            Some(path) => {
                builder = builder.add_source(File::from(path.as_path()).required(true));
            }
            None => {
                for name in DEFAULT_CONFIG_FILES {
                    builder = builder.add_source(File::from(Path::new(name)).required(false));
                }
            }
        }

        if self.load_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let mut config: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if self.load_env {
            config.apply_legacy_overrides(
                std::env::var("PORT").ok(),
                std::env::var("MCP_API_KEY").ok(),
            );
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.server.transport, Transport::Stdio);
        assert_eq!(config.generator.default_max_length, 155);
        assert_eq!(config.generator.phrase_selection, PhraseSelection::First);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[server]
transport = "http"
bind_addr = "127.0.0.1:8088"
api_key = "secret"

[generator]
default_tone = "casual"
phrase_selection = "random"
"#
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(Some(file.path())).build().unwrap();
        assert_eq!(config.server.transport, Transport::Http);
        assert_eq!(config.server.bind_addr, "127.0.0.1:8088");
        assert_eq!(config.server.api_key.as_deref(), Some("secret"));
        assert_eq!(config.generator.default_tone, Tone::Casual);
        assert_eq!(config.generator.phrase_selection, PhraseSelection::Random);
        // untouched sections keep their defaults
        assert_eq!(config.generator.preview_length, 1000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_file_values_are_rejected() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[generator]\ndefault_max_length = 20").unwrap();
        assert!(ConfigLoader::new().with_file(Some(file.path())).build().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = ConfigLoader::new()
            .with_file(Some("/nonexistent/wp-meta.toml"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_legacy_overrides() {
        let mut config = AppConfig::default();
        config.apply_legacy_overrides(Some("8443".to_string()), Some("k3y".to_string()));
        assert_eq!(config.server.bind_addr, "0.0.0.0:8443");
        assert_eq!(config.server.api_key.as_deref(), Some("k3y"));

        config.apply_legacy_overrides(Some("not-a-port".to_string()), Some(" ".to_string()));
        assert_eq!(config.server.bind_addr, "0.0.0.0:8443");
        assert_eq!(config.server.api_key.as_deref(), Some("k3y"));
    }

    #[test]
    fn test_sample_toml_round_trips() {
        let sample = AppConfig::sample_toml().unwrap();
        assert!(sample.starts_with("# wp-meta-rs configuration"));
        let parsed: AppConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
