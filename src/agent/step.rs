//! One model invocation: system prompt rendering, context windowing, and
//! degenerate-output handling.

use anyhow::Result;
use chrono::Local;

use crate::constants::{
    EMPTY_NUDGE_PROMPT, MAX_EMPTY_NUDGES, RECOVERY_PROMPT, SYSTEM_PERSONA, TRUNCATE_HARD_KEEP,
    TRUNCATE_HARD_TOKENS, TRUNCATE_SOFT_KEEP, TRUNCATE_SOFT_TOKENS,
};
use crate::data::User;
use crate::dates;
use crate::message::Message;
use crate::provider::{ChatModel, ModelTurn};
use crate::tools::ToolSchema;

/// Invokes the model once over the current history view.
///
/// The view starts from the truncated history (see [`truncate_view`]); when
/// `recover` is set, a generic recovery instruction is appended so a retry
/// does not replay the input that just failed. If the model returns an
/// empty response with no tool requests, a synthetic "produce a real
/// output" user message is appended and the model re-invoked; the synthetic
/// message lives only in this view, so persisted history never sees it.
pub async fn step(
    model: &dyn ChatModel,
    user: &User,
    history: &[Message],
    schemas: &[ToolSchema],
    recover: bool,
) -> Result<ModelTurn> {
    let system = render_system_prompt(user);
    let mut view: Vec<Message> = truncate_view(history).to_vec();
    if recover {
        view.push(Message::user(RECOVERY_PROMPT));
    }

    let mut nudges = 0;
    loop {
        let turn = model.generate(&system, &view, schemas).await?;
        if turn.text.trim().is_empty() && turn.tool_calls.is_empty() {
            nudges += 1;
            if nudges > MAX_EMPTY_NUDGES {
                anyhow::bail!("model kept returning empty responses");
            }
            view.push(Message::user(EMPTY_NUDGE_PROMPT));
            continue;
        }
        return Ok(turn);
    }
}

/// Applies the context-window budget policy.
///
/// The trigger is the token usage reported on the second-to-last entry (the
/// last completed assistant turn when a fresh user message has just been
/// appended): usage above the hard limit keeps only the last
/// [`TRUNCATE_HARD_KEEP`] entries, above the soft limit the last
/// [`TRUNCATE_SOFT_KEEP`]. Coarse backpressure, not a precise token budget;
/// stored history is left untouched.
pub fn truncate_view(history: &[Message]) -> &[Message] {
    if history.len() < 2 {
        return history;
    }
    let keep = match history[history.len() - 2].token_usage {
        Some(tokens) if tokens > TRUNCATE_HARD_TOKENS => TRUNCATE_HARD_KEEP,
        Some(tokens) if tokens > TRUNCATE_SOFT_TOKENS => TRUNCATE_SOFT_KEEP,
        _ => return history,
    };
    &history[history.len().saturating_sub(keep)..]
}

/// Persona + user context + current date, rendered once per invocation.
fn render_system_prompt(user: &User) -> String {
    let user_json = serde_json::to_string(user).unwrap_or_default();
    format!(
        "{SYSTEM_PERSONA}\n\nCurrent user:\n{user_json}\n\nCurrent date (dd/mm/YYYY): {}.",
        dates::format(Local::now().date_naive())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_with_usage(usage: Option<u64>) -> Message {
        Message::assistant("reply", Vec::new(), usage)
    }

    fn history(second_to_last_usage: Option<u64>, len: usize) -> Vec<Message> {
        let mut messages: Vec<Message> = (0..len - 2).map(|i| Message::user(format!("m{i}"))).collect();
        messages.push(message_with_usage(second_to_last_usage));
        messages.push(Message::user("latest question"));
        messages
    }

    #[test]
    fn high_usage_keeps_last_three() {
        let history = history(Some(7000), 8);
        let view = truncate_view(&history);
        assert_eq!(view.len(), 3);
        assert_eq!(view.last().unwrap().text(), "latest question");
    }

    #[test]
    fn medium_usage_keeps_last_four() {
        let history = history(Some(6000), 8);
        assert_eq!(truncate_view(&history).len(), 4);
    }

    #[test]
    fn low_or_missing_usage_keeps_everything() {
        let low = history(Some(4000), 8);
        assert_eq!(truncate_view(&low).len(), 8);

        let missing = history(None, 8);
        assert_eq!(truncate_view(&missing).len(), 8);
    }

    #[test]
    fn short_histories_pass_through() {
        let history = vec![Message::user("hi")];
        assert_eq!(truncate_view(&history).len(), 1);
    }
}
