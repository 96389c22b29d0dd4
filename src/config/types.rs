//! Struct definitions and serde defaults for renta configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for renta, deserialized from `config.toml`.
///
/// Fields use serde defaults so renta can run with sensible defaults
/// when no config file exists.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Default model identifier (e.g. `"claude-sonnet-4-5"`).
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Default provider name (e.g., "anthropic", "groq").
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Override for the directory holding the CSV tables and policy file.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Policy retriever settings.
    #[serde(default)]
    pub retriever: RetrieverConfig,
}

/// Returns the default model identifier.
///
/// Used by serde's `#[serde(default)]` attribute during deserialization.
pub(super) fn default_model() -> String {
    crate::constants::DEFAULT_MODEL.to_string()
}

/// Provider-specific configuration map.
///
/// Each field corresponds to a supported LLM provider. Only providers
/// the user has configured will be `Some`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    /// Configuration for the Anthropic API provider.
    pub anthropic: Option<ProviderEntry>,
    /// Configuration for the OpenAI API provider.
    pub openai: Option<ProviderEntry>,
    /// Configuration for the Groq API provider.
    pub groq: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderEntry {
    /// API key for authentication. Can also be set via environment variables.
    pub api_key: Option<String>,
    /// Custom base URL for the provider's API.
    pub base_url: Option<String>,
    /// Model identifier to use with this provider, overriding the global default.
    pub model: Option<String>,
}

/// Configuration for the policy document retriever.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct RetrieverConfig {
    /// API key for the embedding endpoint. Can also be set via `HF_API_KEY`.
    pub api_key: Option<String>,
    /// Embedding endpoint URL, overriding the built-in default.
    pub endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            provider: ProviderConfig::default(),
            default_provider: None,
            data_dir: None,
            retriever: RetrieverConfig::default(),
        }
    }
}
