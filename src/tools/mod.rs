//! Tool registry for the support agent.
//!
//! Every capability the model may invoke is a [`Tool`]: a named operation
//! with a JSON Schema for its arguments. The registry is built once at
//! startup and shared read-only; dispatch is a name lookup. Per-thread
//! state (the signed-in user) reaches tools through [`ToolCtx`], never
//! through globals.
//!
//! Expected failures (bad arguments, unknown ids, unavailable cars) are
//! reported as [`ToolResult::error`], not as `Err` — the `Err` path is
//! reserved for genuinely unexpected faults and is wrapped by the
//! dispatcher.

pub mod account;
pub mod booking;
pub mod math;
pub mod policy;
pub mod search;

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::DataStore;
use crate::retriever::Retriever;

use account::{
    BookingHistoryTool, ConfirmPendingTool, ConfirmedBookingsTool, PendingBookingsTool,
    PersonalInfoTool,
};
use booking::{BookingCancelTool, BookingUpdateTool, CarBookingTool, IsCarAvailableTool};
use math::{CalculatorTool, DatesCalculatorTool};
use policy::LookupPolicyTool;
use search::{CarSearchTool, ShowCarInfoTool, ShowCarsTool};

/// The result of executing a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: String) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    /// Serializes a payload as the success content.
    pub fn success_json(payload: &Value) -> Self {
        Self::success(payload.to_string())
    }

    pub fn error(content: String) -> Self {
        Self {
            content,
            is_error: true,
        }
    }
}

/// Per-thread context injected into every tool invocation.
#[derive(Debug, Clone, Copy)]
pub struct ToolCtx {
    /// The signed-in user the conversation belongs to.
    pub user_id: i64,
}

/// Definition sent to the LLM so it knows what tools are available.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value, // JSON Schema
}

/// Every tool implements this trait.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the LLM uses to call this tool.
    fn name(&self) -> &str;

    /// Human-readable description for the model.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn schema(&self) -> Value;

    /// Execute the tool with the given JSON input.
    async fn execute(&self, ctx: &ToolCtx, input: Value) -> Result<ToolResult>;
}

/// Holds all registered tools and resolves calls by name.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Called during startup.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(Arc::from(tool));
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Produce definitions for the LLM (sent with each request).
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .iter()
            .map(|t| ToolSchema {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.schema(),
            })
            .collect()
    }

    /// How many tools are registered.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up a tool by name and execute it.
    #[cfg(test)]
    pub async fn execute(&self, ctx: &ToolCtx, name: &str, input: Value) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;
        tool.execute(ctx, input).await
    }
}

impl ToolRegistry {
    /// Create a registry with the full support tool set.
    pub fn with_builtins(store: DataStore, retriever: Arc<dyn Retriever>) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CarSearchTool::new(store.clone())));
        registry.register(Box::new(ShowCarsTool::new(store.clone())));
        registry.register(Box::new(ShowCarInfoTool::new(store.clone())));
        registry.register(Box::new(IsCarAvailableTool::new(store.clone())));
        registry.register(Box::new(CarBookingTool::new(store.clone())));
        registry.register(Box::new(BookingCancelTool::new(store.clone())));
        registry.register(Box::new(BookingUpdateTool::new(store.clone())));
        registry.register(Box::new(ConfirmPendingTool));
        registry.register(Box::new(PendingBookingsTool::new(store.clone())));
        registry.register(Box::new(ConfirmedBookingsTool::new(store.clone())));
        registry.register(Box::new(BookingHistoryTool::new(store.clone())));
        registry.register(Box::new(PersonalInfoTool::new(store)));
        registry.register(Box::new(LookupPolicyTool::new(retriever)));
        registry.register(Box::new(CalculatorTool));
        registry.register(Box::new(DatesCalculatorTool::new()));
        registry
    }
}

#[cfg(test)]
mod tests;
