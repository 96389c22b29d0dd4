//! LLM provider abstraction for renta.
//!
//! The orchestration loop talks to a [`ChatModel`]: one non-streaming
//! completion per call, returning the assistant text, any tool-call
//! requests, and the reported token usage. [`Provider`] implements it on
//! top of rig-core clients with enum dispatch (Anthropic, OpenAI, Groq),
//! keeping provider-specific details out of the agent.

mod client;
mod kind;

pub use client::Provider;
#[allow(unused_imports)]
pub use kind::{default_model_for, ProviderKind};
pub use kind::{resolve_model, ModelSelection};

use anyhow::Result;

use crate::message::{Message, ToolCall};
use crate::tools::ToolSchema;

/// One model response: a direct answer, tool requests, or both.
#[derive(Debug, Clone)]
pub struct ModelTurn {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    /// Total tokens the provider reported for this exchange.
    pub token_usage: Option<u64>,
}

/// A language model that can be asked for one completion over a rendered
/// system prompt, a message history, and the available tool schemas.
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        history: &[Message],
        tools: &[ToolSchema],
    ) -> Result<ModelTurn>;
}
