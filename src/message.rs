//! Message types for renta's conversation history.
//!
//! Provides a structured [`Message`] type with [`Role`] and [`Content`] enums
//! that represent conversation turns. Assistant messages may carry tool-call
//! requests and the provider-reported token usage; tool messages carry the
//! id of the request they answer and an error flag. These are renta's
//! internal types, converted to provider-specific formats (e.g. rig-core's
//! `Message`) when sent to the LLM.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool invocation requested by the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call (used to match results).
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON arguments to pass to the tool.
    pub arguments: Value,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Content,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Whether a tool result reports a failure.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    /// Total tokens the provider reported for the exchange that produced
    /// this message. Only set on assistant messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<u64>,
}

/// The role of a message sender in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// Message content, currently text-only but structured for future multimodal support.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Text(text.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            is_error: false,
            token_usage: None,
        }
    }

    // Part of the message API; the agent renders its system prompt as the
    // provider preamble instead of appending it to history.
    #[allow(dead_code)]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Content::Text(text.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            is_error: false,
            token_usage: None,
        }
    }

    /// Creates an assistant turn. `tool_calls` may be empty (direct answer)
    /// or non-empty (tool requests, order-preserving).
    pub fn assistant(
        text: impl Into<String>,
        tool_calls: Vec<ToolCall>,
        token_usage: Option<u64>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::Text(text.into()),
            tool_calls,
            tool_call_id: None,
            is_error: false,
            token_usage,
        }
    }

    /// Creates a tool result message to feed back to the LLM.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: Content::Text(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
            is_error,
            token_usage: None,
        }
    }

    pub fn text(&self) -> &str {
        match &self.content {
            Content::Text(s) => s,
        }
    }

    /// An assistant message with real textual content and reported token
    /// usage, i.e. the turn that completes a user/assistant exchange.
    pub fn is_substantive_reply(&self) -> bool {
        self.role == Role::Assistant
            && !self.text().trim().is_empty()
            && self.token_usage.is_some()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "you"),
            Role::Assistant => write!(f, "renta"),
            Role::Tool => write!(f, "tool"),
        }
    }
}
