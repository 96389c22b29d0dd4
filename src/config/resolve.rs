//! Environment variable substitution and API key resolution.

use super::types::{Config, ProviderEntry};

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        self.model = Self::resolve_str(&self.model);
        if let Some(ref mut dp) = self.default_provider {
            *dp = Self::resolve_str(dp);
        }
        Self::resolve_provider_entry(&mut self.provider.anthropic);
        Self::resolve_provider_entry(&mut self.provider.openai);
        Self::resolve_provider_entry(&mut self.provider.groq);
        if let Some(ref mut key) = self.retriever.api_key {
            *key = Self::resolve_str(key);
        }
        if let Some(ref mut endpoint) = self.retriever.endpoint {
            *endpoint = Self::resolve_str(endpoint);
        }
    }

    /// Resolves `{env:VAR}` patterns in a single provider entry's `api_key` and `base_url`.
    fn resolve_provider_entry(entry: &mut Option<ProviderEntry>) {
        if let Some(ref mut e) = entry {
            if let Some(ref mut key) = e.api_key {
                *key = Self::resolve_str(key);
            }
            if let Some(ref mut url) = e.base_url {
                *url = Self::resolve_str(url);
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    fn resolve_str(s: &str) -> String {
        let mut result = s.to_string();
        while let Some(start) = result.find("{env:") {
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 5..start + end];
                let value = std::env::var(var_name).unwrap_or_default();
                result = format!(
                    "{}{}{}",
                    &result[..start],
                    value,
                    &result[start + end + 1..]
                );
            } else {
                break;
            }
        }
        result
    }

    /// Resolve API key for a provider: env var first, then config value.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        // Check env var first (ANTHROPIC_API_KEY, GROQ_API_KEY, etc.)
        let env_key = format!("{}_API_KEY", provider.to_uppercase());
        if let Ok(val) = std::env::var(&env_key) {
            if !val.is_empty() {
                return Some(val);
            }
        }

        // Fall back to config
        let entry = match provider {
            "anthropic" => &self.provider.anthropic,
            "openai" => &self.provider.openai,
            "groq" => &self.provider.groq,
            _ => &None,
        };
        entry.as_ref().and_then(|e| e.api_key.clone())
    }

    /// Get the configured default provider name, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.default_provider.as_deref()
    }

    /// Get the model name from config, stripping provider prefix if present.
    /// Returns None if the model is the compile-time default (meaning user hasn't configured it).
    pub fn model_name(&self) -> Option<String> {
        let m = &self.model;
        if m == crate::constants::DEFAULT_MODEL {
            return None; // treat default as "not configured"
        }
        // If model contains slash, extract just the model part
        if let Some((_prov, model)) = m.split_once('/') {
            Some(model.to_string())
        } else {
            Some(m.to_string())
        }
    }

    /// API key for the embedding endpoint: env var first, then config.
    pub fn retriever_api_key(&self) -> Option<String> {
        if let Ok(val) = std::env::var("HF_API_KEY") {
            if !val.is_empty() {
                return Some(val);
            }
        }
        self.retriever
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
    }

    /// Embedding endpoint, falling back to the built-in default.
    pub fn retriever_endpoint(&self) -> String {
        self.retriever
            .endpoint
            .clone()
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| crate::constants::EMBEDDING_ENDPOINT.to_string())
    }
}
