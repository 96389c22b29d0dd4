//! Company policy lookup backed by the embedding retriever.

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolCtx, ToolResult};
use crate::constants::POLICY_TOP_K;
use crate::retriever::Retriever;

/// Returns the policy sections most relevant to a question. The system
/// prompt tells the model to consult this before any booking change; that
/// contract is conveyed in the instructions, not enforced here.
pub struct LookupPolicyTool {
    retriever: Arc<dyn Retriever>,
}

impl LookupPolicyTool {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self { retriever }
    }
}

#[derive(Deserialize)]
struct LookupPolicyInput {
    query: String,
}

#[async_trait::async_trait]
impl Tool for LookupPolicyTool {
    fn name(&self) -> &str {
        "lookup_policy"
    }

    fn description(&self) -> &str {
        "Consult the company policies to check whether certain options are permitted. \
         Use this before making booking changes or other write operations."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Question to look up in the company policies"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, _ctx: &ToolCtx, input: Value) -> Result<ToolResult> {
        let input: LookupPolicyInput = serde_json::from_value(input)?;
        let docs = self.retriever.query(&input.query, POLICY_TOP_K).await?;
        let joined = docs
            .iter()
            .map(|d| d.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(ToolResult::success(joined))
    }
}
