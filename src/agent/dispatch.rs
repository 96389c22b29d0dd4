//! Tool dispatcher: executes the model's tool requests against the registry.
//!
//! Every request yields exactly one tool result message with a matching
//! call id, appended in request order. Nothing here ever fails the
//! conversation: unknown tools, rejected arguments, and unexpected tool
//! faults all become error-typed results carrying a corrective instruction
//! for the model.

use crate::message::{Message, ToolCall};
use crate::output::Renderer;
use crate::tools::{ToolCtx, ToolRegistry, ToolResult};

/// Outcome of dispatching one assistant turn's tool requests.
pub struct DispatchReport {
    /// One result message per request, in request order.
    pub results: Vec<Message>,
    /// Whether any request named a tool that does not exist. Counts
    /// against the loop's retry budget.
    pub unknown_tool: bool,
}

/// Executes `calls` in request order and pairs each with a result by id.
pub async fn dispatch(
    registry: &ToolRegistry,
    ctx: &ToolCtx,
    calls: &[ToolCall],
    renderer: &mut dyn Renderer,
) -> DispatchReport {
    let mut results = Vec::with_capacity(calls.len());
    let mut unknown_tool = false;

    for call in calls {
        renderer.tool_start(&call.name, &call.arguments);
        let result = match registry.get(&call.name) {
            None => {
                unknown_tool = true;
                ToolResult::error(format!(
                    "Error: unknown tool '{}'. Please fix your mistakes.",
                    call.name
                ))
            }
            Some(tool) => match tool.execute(ctx, call.arguments.clone()).await {
                Ok(result) => result,
                Err(e) => {
                    log::warn!("tool {} failed: {e:#}", call.name);
                    ToolResult::error(format!("Error: {e:#}. Please fix your mistakes."))
                }
            },
        };
        renderer.tool_result(&call.name, &result);
        results.push(Message::tool_result(
            &call.id,
            result.content,
            result.is_error,
        ));
    }

    DispatchReport {
        results,
        unknown_tool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::NullRenderer;
    use crate::tools::Tool;
    use anyhow::Result;
    use serde_json::{json, Value};

    struct EchoTool;

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes its input."
        }
        fn schema(&self) -> Value {
            json!({ "type": "object" })
        }
        async fn execute(&self, _ctx: &ToolCtx, input: Value) -> Result<ToolResult> {
            Ok(ToolResult::success(input.to_string()))
        }
    }

    struct FaultyTool;

    #[async_trait::async_trait]
    impl Tool for FaultyTool {
        fn name(&self) -> &str {
            "faulty"
        }
        fn description(&self) -> &str {
            "Always blows up."
        }
        fn schema(&self) -> Value {
            json!({ "type": "object" })
        }
        async fn execute(&self, _ctx: &ToolCtx, _input: Value) -> Result<ToolResult> {
            anyhow::bail!("boom")
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.register(Box::new(FaultyTool));
        registry
    }

    fn call(id: &str, name: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments: json!({ "n": id }),
        }
    }

    const CTX: ToolCtx = ToolCtx { user_id: 101 };

    #[tokio::test]
    async fn results_pair_by_id_in_request_order() {
        let registry = registry();
        let calls = vec![call("a", "echo"), call("b", "echo"), call("c", "echo")];
        let report = dispatch(&registry, &CTX, &calls, &mut NullRenderer).await;

        assert!(!report.unknown_tool);
        let ids: Vec<_> = report
            .results
            .iter()
            .map(|m| m.tool_call_id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(report.results.iter().all(|m| !m.is_error));
    }

    #[tokio::test]
    async fn unknown_tool_is_flagged_and_still_answered() {
        let registry = registry();
        let calls = vec![call("a", "echo"), call("b", "teleport")];
        let report = dispatch(&registry, &CTX, &calls, &mut NullRenderer).await;

        assert!(report.unknown_tool);
        assert_eq!(report.results.len(), 2);
        let bad = &report.results[1];
        assert!(bad.is_error);
        assert_eq!(bad.tool_call_id.as_deref(), Some("b"));
        assert!(bad.text().contains("unknown tool 'teleport'"));
        assert!(bad.text().contains("fix your mistakes"));
    }

    #[tokio::test]
    async fn tool_faults_become_error_results() {
        let registry = registry();
        let calls = vec![call("a", "faulty")];
        let report = dispatch(&registry, &CTX, &calls, &mut NullRenderer).await;

        assert!(!report.unknown_tool);
        let result = &report.results[0];
        assert!(result.is_error);
        assert!(result.text().contains("boom"));
        assert!(result.text().contains("fix your mistakes"));
    }
}
