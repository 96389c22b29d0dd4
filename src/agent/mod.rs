//! The conversational support agent.
//!
//! [`Agent::respond`] is the single entry point the presentation layer
//! calls: it owns the orchestration state machine that alternates between
//! "let the model decide" and "execute the requested tools" until the model
//! produces a final direct reply or the retry budget runs out. The call
//! never fails and never returns an empty string — worst case is the fixed
//! clarification fallback.
//!
//! Failure policy, in order of appearance in the loop:
//! - a failed model invocation (network/provider fault, or persistent empty
//!   output) consumes one retry and re-enters with a recovery instruction;
//! - a direct answer whose text signals an error ("error"/"wait",
//!   case-insensitive) is a soft failure and is treated the same way; the
//!   soft text is never the returned reply;
//! - a turn requesting an unknown tool consumes one retry after its error
//!   results are appended, so a model that only ever asks for nonexistent
//!   tools runs out of budget within three invocations;
//! - well-formed tool round-trips are bounded separately by
//!   [`MAX_TOOL_ROUNDS`].

mod dispatch;
mod sanitize;
mod step;

use std::sync::Arc;

use crate::constants::{FALLBACK_REPLY, MAX_RETRIES, MAX_TOOL_ROUNDS};
use crate::message::Message;
use crate::output::Renderer;
use crate::provider::ChatModel;
use crate::thread::ConversationThread;
use crate::tools::{ToolCtx, ToolRegistry};

/// The orchestration loop and its collaborators. Stateless across calls;
/// all conversation state lives in the [`ConversationThread`].
pub struct Agent {
    model: Arc<dyn ChatModel>,
    tools: Arc<ToolRegistry>,
}

impl Agent {
    pub fn new(model: Arc<dyn ChatModel>, tools: Arc<ToolRegistry>) -> Self {
        Self { model, tools }
    }

    /// Answers one user prompt, driving the model/tool loop to completion.
    ///
    /// Always returns text: the model's final reply, or [`FALLBACK_REPLY`]
    /// when the retry budget is exhausted. The fallback is returned to the
    /// caller but never persisted as assistant content.
    pub async fn respond(
        &self,
        thread: &mut ConversationThread,
        prompt: &str,
        renderer: &mut dyn Renderer,
    ) -> String {
        record(thread, Message::user(prompt));
        let ctx = ToolCtx {
            user_id: thread.user.user_id,
        };
        let schemas = self.tools.schemas();

        let mut retries = 0u32;
        let mut rounds = 0u32;
        let mut recover = false;

        loop {
            let turn = match step::step(
                self.model.as_ref(),
                &thread.user,
                thread.snapshot(),
                &schemas,
                recover,
            )
            .await
            {
                Ok(turn) => turn,
                Err(e) => {
                    log::warn!("model invocation failed: {e:#}");
                    retries += 1;
                    if retries > MAX_RETRIES {
                        break;
                    }
                    renderer.retrying(retries, "provider error");
                    recover = true;
                    continue;
                }
            };
            recover = false;

            if turn.tool_calls.is_empty() {
                if is_soft_failure(&turn.text) {
                    log::warn!("model reported a soft failure: {}", turn.text);
                    retries += 1;
                    if retries > MAX_RETRIES {
                        break;
                    }
                    renderer.retrying(retries, "soft model error");
                    recover = true;
                    continue;
                }

                let reply = turn.text.clone();
                record(
                    thread,
                    Message::assistant(turn.text, Vec::new(), turn.token_usage),
                );
                if let Err(e) = sanitize::run(thread) {
                    log::warn!("history sanitation failed: {e:#}");
                }
                return reply;
            }

            if rounds >= MAX_TOOL_ROUNDS {
                log::warn!("tool round budget exhausted");
                break;
            }
            rounds += 1;

            record(
                thread,
                Message::assistant(turn.text, turn.tool_calls.clone(), turn.token_usage),
            );
            let report =
                dispatch::dispatch(&self.tools, &ctx, &turn.tool_calls, renderer).await;
            for msg in report.results {
                record(thread, msg);
            }
            if report.unknown_tool {
                retries += 1;
                if retries > MAX_RETRIES {
                    break;
                }
            }
        }

        FALLBACK_REPLY.to_string()
    }
}

/// The model sometimes reports a failure inside an otherwise successful
/// response; a case-insensitive scan for the usual markers catches those.
fn is_soft_failure(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("error") || lower.contains("wait")
}

/// Appends to the thread; persistence problems are logged, never allowed to
/// break the conversation.
fn record(thread: &mut ConversationThread, msg: Message) {
    if let Err(e) = thread.append(msg) {
        log::warn!("failed to persist message: {e:#}");
    }
}
