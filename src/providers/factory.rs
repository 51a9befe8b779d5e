use log::info;
use std::str::FromStr;

use crate::config::{AppConfig, ProviderConfig};
use crate::error::SimpliCookError;
use crate::generator::RecipeGenerator;
use crate::model::{RecipeId, RecipeIdGenerator};
use crate::providers::{AnthropicProvider, LlmProvider, OllamaProvider, OpenAIProvider};

/// Completion backends a generator can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Ollama,
}

impl FromStr for ProviderKind {
    type Err = SimpliCookError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(SimpliCookError::Provider(format!("Unknown provider: {}", other))),
        }
    }
}

impl ProviderKind {
    /// Instantiate the provider from its configuration section
    pub fn connect(self, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>, SimpliCookError> {
        let provider: Box<dyn LlmProvider> = match self {
            ProviderKind::OpenAI => Box::new(OpenAIProvider::new(config).map_err(provider_error)?),
            ProviderKind::Anthropic => {
                Box::new(AnthropicProvider::new(config).map_err(provider_error)?)
            }
            ProviderKind::Ollama => Box::new(OllamaProvider::new(config).map_err(provider_error)?),
        };
        Ok(provider)
    }
}

fn provider_error(e: Box<dyn std::error::Error + Send + Sync>) -> SimpliCookError {
    SimpliCookError::Provider(e.to_string())
}

/// Create the provider configured under `name`
pub fn build_provider(
    name: &str,
    config: &ProviderConfig,
) -> Result<Box<dyn LlmProvider>, SimpliCookError> {
    if !config.enabled {
        return Err(SimpliCookError::Provider(format!(
            "Provider '{}' is not enabled in configuration",
            name
        )));
    }
    name.parse::<ProviderKind>()?.connect(config)
}

/// Build a generator for the configured default provider.
///
/// New ids continue after `saved_floor` (the highest id already saved), so
/// fresh recipes never clash with stored ones.
pub fn build_generator(
    config: &AppConfig,
    saved_floor: Option<RecipeId>,
) -> Result<RecipeGenerator, SimpliCookError> {
    let name = &config.default_provider;
    let provider_config = config.providers.get(name).ok_or_else(|| {
        SimpliCookError::Provider(format!(
            "Default provider '{}' not found in configuration",
            name
        ))
    })?;

    let provider = build_provider(name, provider_config)?;
    info!("Using '{}' for recipe generation", provider.provider_name());
    Ok(RecipeGenerator::with_ids(provider, id_source(saved_floor)))
}

fn id_source(saved_floor: Option<RecipeId>) -> RecipeIdGenerator {
    match saved_floor {
        Some(floor) => RecipeIdGenerator::starting_after(floor),
        None => RecipeIdGenerator::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn keyed(model: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            model: model.map(str::to_string),
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    fn app_config(default_provider: &str, providers: Vec<(&str, ProviderConfig)>) -> AppConfig {
        AppConfig {
            default_provider: default_provider.to_string(),
            providers: providers
                .into_iter()
                .map(|(name, config)| (name.to_string(), config))
                .collect::<HashMap<_, _>>(),
            ..Default::default()
        }
    }

    #[test]
    fn test_provider_kind_from_name() {
        let parse = |name: &str| name.parse::<ProviderKind>().unwrap();
        assert_eq!(parse("openai"), ProviderKind::OpenAI);
        assert_eq!(parse(" Anthropic "), ProviderKind::Anthropic);
        assert_eq!(parse("OLLAMA"), ProviderKind::Ollama);

        let err = "gemini".parse::<ProviderKind>().unwrap_err();
        assert_eq!(err.to_string(), "Provider error: Unknown provider: gemini");
    }

    #[test]
    fn test_build_provider_for_each_kind() {
        for name in ["openai", "anthropic", "ollama"] {
            let provider = build_provider(name, &keyed(None)).unwrap();
            assert_eq!(provider.provider_name(), name);
        }
    }

    #[test]
    fn test_disabled_provider_is_rejected() {
        let config = ProviderConfig {
            enabled: false,
            ..keyed(None)
        };

        let err = build_provider("ollama", &config).err().unwrap();
        assert!(matches!(err, SimpliCookError::Provider(ref m) if m.contains("not enabled")));
    }

    #[test]
    fn test_build_generator_uses_default_provider() {
        let config = app_config(
            "anthropic",
            vec![
                ("openai", keyed(None)),
                ("anthropic", keyed(Some("claude-3-5-haiku-latest"))),
            ],
        );

        let generator = build_generator(&config, None).unwrap();
        assert_eq!(generator.provider_name(), "anthropic");
        assert!(!generator.is_generating());
    }

    #[test]
    fn test_build_generator_without_default_section() {
        let config = app_config("anthropic", vec![("openai", keyed(None))]);

        let err = build_generator(&config, None).err().unwrap();
        assert!(err.to_string().contains("'anthropic' not found"));
    }

    #[test]
    fn test_id_source_continues_after_saved_ids() {
        let floor = RecipeId(u64::MAX / 2);
        assert_eq!(id_source(Some(floor)).next_id(), RecipeId(floor.0 + 1));
        assert!(id_source(None).next_id() < floor);
    }
}
