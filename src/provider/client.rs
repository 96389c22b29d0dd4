//! rig-core backed [`ChatModel`] implementation.
//!
//! Contains the [`Provider`] struct which wraps rig-core provider clients
//! behind enum dispatch, keeping provider-specific details out of the agent
//! loop. Supports Anthropic, OpenAI, and Groq. Each call is a single
//! non-streaming completion carrying the rendered system prompt, the
//! (possibly truncated) history view, and the tool schemas.

use std::collections::HashSet;

use anyhow::{Context, Result};
use rig::client::CompletionClient;
use rig::completion::{CompletionModel, ToolDefinition as RigToolDefinition};
use rig::message::{
    AssistantContent, Message as RigMessage, Text, ToolCall as RigToolCall, ToolFunction,
};
use rig::providers::{anthropic, groq, openai};
use rig::OneOrMany;

use super::{ChatModel, ModelTurn};
use crate::config::Config;
use crate::constants::{MAX_TOKENS, TEMPERATURE};
use crate::message::{Message, Role, ToolCall};
use crate::provider::{ModelSelection, ProviderKind};
use crate::tools::ToolSchema;

/// Internal enum wrapping provider-specific clients.
enum ClientKind {
    Anthropic(anthropic::Client),
    OpenAI(openai::Client),
    Groq(groq::Client),
}

/// A configured LLM provider ready to handle completion requests.
pub struct Provider {
    client: ClientKind,
    model: String,
}

/// Dispatches an operation across provider-specific clients.
///
/// Matches on [`ClientKind`] and executes the same block for each variant,
/// letting the compiler monomorphize per provider.
macro_rules! dispatch {
    ($self:expr, |$client:ident| $body:expr) => {
        match &$self.client {
            ClientKind::Anthropic($client) => $body,
            ClientKind::OpenAI($client) => $body,
            ClientKind::Groq($client) => $body,
        }
    };
}

impl Provider {
    /// Creates a new [`Provider`] from the loaded application config.
    ///
    /// Resolves the API key through renta's config precedence chain
    /// (env var → config file → substitution) and builds the appropriate
    /// provider client. Defaults to Anthropic when no provider is specified.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is found for the selected provider
    /// or if client construction fails.
    pub fn from_config(config: &Config, selection: &ModelSelection) -> Result<Self> {
        match selection.provider {
            ProviderKind::Anthropic => {
                let api_key = config
                    .resolve_api_key("anthropic")
                    .context("No API key found for Anthropic. Set ANTHROPIC_API_KEY or configure it in config.toml")?;
                let client = anthropic::Client::new(&api_key)
                    .context("Failed to create Anthropic client")?;
                Ok(Self {
                    client: ClientKind::Anthropic(client),
                    model: selection.model.clone(),
                })
            }
            ProviderKind::OpenAI => {
                let api_key = config
                    .resolve_api_key("openai")
                    .context("No API key found for OpenAI. Set OPENAI_API_KEY or configure it in config.toml")?;
                let client =
                    openai::Client::new(&api_key).context("Failed to create OpenAI client")?;
                Ok(Self {
                    client: ClientKind::OpenAI(client),
                    model: selection.model.clone(),
                })
            }
            ProviderKind::Groq => {
                let api_key = config
                    .resolve_api_key("groq")
                    .context("No API key found for Groq. Set GROQ_API_KEY or configure it in config.toml")?;
                let client =
                    groq::Client::new(&api_key).context("Failed to create Groq client")?;
                Ok(Self {
                    client: ClientKind::Groq(client),
                    model: selection.model.clone(),
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl ChatModel for Provider {
    async fn generate(
        &self,
        system: &str,
        history: &[Message],
        tools: &[ToolSchema],
    ) -> Result<ModelTurn> {
        let mut converted = convert_history(history);
        let prompt = converted
            .pop()
            .unwrap_or_else(|| RigMessage::user(String::new()));

        let tool_defs: Vec<RigToolDefinition> = tools
            .iter()
            .map(|t| RigToolDefinition {
                name: t.name.clone(),
                description: t.description.clone(),
                parameters: t.parameters.clone(),
            })
            .collect();

        dispatch!(self, |client| {
            let model = client.completion_model(&self.model);
            let response = model
                .completion_request(prompt.clone())
                .preamble(system.to_string())
                .messages(converted.clone())
                .tools(tool_defs.clone())
                .max_tokens(MAX_TOKENS)
                .temperature(TEMPERATURE)
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("Completion request failed: {e}"))?;
            let total_tokens = response.usage.total_tokens;
            Ok(extract_turn(response.choice, total_tokens))
        })
    }
}

/// Flattens a completion choice into renta's [`ModelTurn`].
fn extract_turn(choice: OneOrMany<AssistantContent>, total_tokens: u64) -> ModelTurn {
    let mut text = String::new();
    let mut tool_calls = Vec::new();
    for item in choice.iter() {
        match item {
            AssistantContent::Text(Text { text: chunk }) => text.push_str(chunk),
            AssistantContent::ToolCall(call) => tool_calls.push(ToolCall {
                id: call.id.clone(),
                name: call.function.name.clone(),
                arguments: call.function.arguments.clone(),
            }),
            // Reasoning and future content kinds carry no reply text.
            _ => {}
        }
    }
    ModelTurn {
        text,
        tool_calls,
        token_usage: (total_tokens > 0).then_some(total_tokens),
    }
}

/// Converts renta messages to rig-core messages.
///
/// System messages are skipped (the system prompt travels as the preamble).
/// A tool result whose requesting assistant turn is no longer in the view
/// (the sanitizer keeps normalized tool evidence but drops the tool-call
/// turn) is downgraded to plain user text so providers don't reject the
/// conversation for a dangling tool-call id.
fn convert_history(history: &[Message]) -> Vec<RigMessage> {
    let known_ids: HashSet<&str> = history
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .flat_map(|m| m.tool_calls.iter().map(|c| c.id.as_str()))
        .collect();

    history
        .iter()
        .filter_map(|msg| convert_message(msg, &known_ids))
        .collect()
}

fn convert_message(msg: &Message, known_ids: &HashSet<&str>) -> Option<RigMessage> {
    match msg.role {
        Role::System => None,
        Role::User => Some(RigMessage::user(msg.text())),
        Role::Assistant => {
            if msg.tool_calls.is_empty() {
                Some(RigMessage::assistant(msg.text()))
            } else {
                let mut items: Vec<AssistantContent> = Vec::new();
                let text = msg.text();
                if !text.is_empty() {
                    items.push(AssistantContent::Text(Text {
                        text: text.to_string(),
                    }));
                }
                for tc in &msg.tool_calls {
                    items.push(AssistantContent::ToolCall(RigToolCall::new(
                        tc.id.clone(),
                        ToolFunction::new(tc.name.clone(), tc.arguments.clone()),
                    )));
                }
                Some(RigMessage::Assistant {
                    id: None,
                    content: OneOrMany::many(items)
                        .unwrap_or_else(|_| OneOrMany::one(AssistantContent::text(""))),
                })
            }
        }
        Role::Tool => match &msg.tool_call_id {
            Some(id) if known_ids.contains(id.as_str()) => {
                Some(RigMessage::tool_result(id.clone(), msg.text()))
            }
            _ => Some(RigMessage::user(format!(
                "Earlier tool evidence: {}",
                msg.text()
            ))),
        },
    }
}
