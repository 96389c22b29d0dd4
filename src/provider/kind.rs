//! Provider selection: backend kinds, default models, and resolution from
//! CLI flags, config, and built-in defaults.

use anyhow::{anyhow, Result};

use crate::config::Config;
use crate::constants::DEFAULT_PROVIDER;

/// Identifies which LLM provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Anthropic (Claude models).
    Anthropic,
    /// OpenAI (GPT models).
    OpenAI,
    /// Groq (hosted open-weight models with tool use).
    Groq,
}

impl ProviderKind {
    /// Parses a provider name string into a [`ProviderKind`].
    ///
    /// Matching is case-insensitive. Returns an error for unknown providers.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAI),
            "groq" => Ok(Self::Groq),
            other => Err(anyhow!(
                "Unknown provider: {other}. Supported: anthropic, openai, groq"
            )),
        }
    }
}

/// Returns the default model identifier for a given provider.
pub fn default_model_for(provider: &ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Anthropic => crate::constants::DEFAULT_MODEL,
        ProviderKind::OpenAI => crate::constants::DEFAULT_OPENAI_MODEL,
        ProviderKind::Groq => crate::constants::DEFAULT_GROQ_MODEL,
    }
}

/// Resolved provider + model pair.
pub struct ModelSelection {
    pub provider: ProviderKind,
    pub model: String,
}

/// Resolves which provider and model to use: CLI flags win over
/// config.toml, which wins over the built-in defaults. A `--model` of the
/// form `provider/name` picks both at once when no explicit `--provider`
/// is given.
pub fn resolve_model(
    cli_provider: Option<&str>,
    cli_model: Option<&str>,
    config: &Config,
) -> Result<ModelSelection> {
    if cli_provider.is_none() {
        if let Some((prov, model)) = cli_model.and_then(|m| m.split_once('/')) {
            return Ok(ModelSelection {
                provider: ProviderKind::from_str(prov)?,
                model: model.to_string(),
            });
        }
    }

    let provider = ProviderKind::from_str(
        cli_provider
            .or(config.provider_name())
            .unwrap_or(DEFAULT_PROVIDER),
    )?;
    let model = match cli_model {
        Some(m) => m.to_string(),
        None => config
            .model_name()
            .unwrap_or_else(|| default_model_for(&provider).to_string()),
    };

    Ok(ModelSelection { provider, model })
}
