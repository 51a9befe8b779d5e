use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Provider used for recipe generation
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
    /// Where saved recipes are persisted
    #[serde(default)]
    pub storage: StorageConfig,
    /// Recipe catalog backend
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: default_providers(),
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for a specific completion provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier; each provider falls back to its own default when unset
    pub model: Option<String>,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key (can also be set via the provider's environment variable)
    pub api_key: Option<String>,
    /// Base URL for the API endpoint (for proxies or local servers)
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Durable storage location for saved recipes
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Recipe catalog backend (trending, search and category listings)
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "openai".to_string()
}

fn default_providers() -> HashMap<String, ProviderConfig> {
    HashMap::from([(default_provider(), ProviderConfig::default())])
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".simplicook")
}

fn default_catalog_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with SIMPLICOOK__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: SIMPLICOOK__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from `config.toml` (optional) and `SIMPLICOOK__*`
/// environment variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: SIMPLICOOK__PROVIDERS__OPENAI__API_KEY
        .add_source(
            Environment::with_prefix("SIMPLICOOK")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use std::env;

    fn from_toml(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider(), "openai");
        assert_eq!(default_temperature(), 0.7);
        assert_eq!(default_max_tokens(), 500);
        assert_eq!(default_catalog_url(), "http://localhost:5000");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = from_toml("");
        assert_eq!(config.default_provider, "openai");
        assert!(config.providers.contains_key("openai"));
        assert_eq!(config.storage.dir, PathBuf::from(".simplicook"));
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn test_provider_section() {
        let config = from_toml(
            r#"
            default_provider = "ollama"

            [providers.ollama]
            model = "llama3"
            base_url = "http://localhost:11434"
            max_tokens = 800

            [catalog]
            base_url = "http://recipes.internal:8080"
            "#,
        );

        let ollama = &config.providers["ollama"];
        assert!(ollama.enabled);
        assert_eq!(ollama.model.as_deref(), Some("llama3"));
        assert_eq!(ollama.max_tokens, 800);
        assert_eq!(ollama.temperature, 0.7);
        assert!(ollama.api_key.is_none());
        assert_eq!(config.catalog.base_url, "http://recipes.internal:8080");
    }

    #[test]
    fn test_provider_section_without_model_leaves_it_unset() {
        let config = from_toml(
            r#"
            default_provider = "anthropic"

            [providers.anthropic]
            api_key = "k"
            "#,
        );

        let anthropic = &config.providers["anthropic"];
        assert!(anthropic.model.is_none());
        assert_eq!(anthropic.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_load_config_without_file_or_overrides() {
        let overrides: Vec<String> = env::vars()
            .map(|(k, _)| k)
            .filter(|k| k.starts_with("SIMPLICOOK__"))
            .collect();
        for key in overrides {
            env::remove_var(&key);
        }

        let config = load_config().unwrap();
        assert_eq!(config.default_provider, "openai");
        assert!(config.providers["openai"].model.is_none());
        assert_eq!(config.catalog.base_url, "http://localhost:5000");
        assert_eq!(config.timeout, 30);
    }
}
