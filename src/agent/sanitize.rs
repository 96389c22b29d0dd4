//! History sanitizer: post-exchange compaction of tool-result noise.
//!
//! Once an exchange completes (an assistant message with real text and
//! reported token usage lands), the thread history is rewritten so that
//! only user turns, substantive assistant turns, and normalized tool
//! evidence remain. Tool results that reference a booking or car are
//! reduced to a minimal id list; everything else from the exchange's
//! middle steps is removed.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde_json::{json, Value};

use crate::message::{Message, Role};
use crate::thread::ConversationThread;

static BOOKING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"booking_id\D*(\d+)").expect("valid booking id pattern"));
static CAR_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"car_id\D*(\d+)").expect("valid car id pattern"));

/// Sanitizes the thread if its last message completes an exchange;
/// otherwise leaves it untouched.
pub fn run(thread: &mut ConversationThread) -> Result<()> {
    let completes = thread
        .messages
        .last()
        .map(Message::is_substantive_reply)
        .unwrap_or(false);
    if !completes {
        return Ok(());
    }
    let cleaned = sanitize(thread.snapshot());
    thread.replace(cleaned)
}

/// Produces the compacted history:
/// - user and system turns are kept as-is;
/// - assistant turns that only carried tool requests are dropped, and kept
///   assistant turns lose their request list (the surviving tool evidence
///   stands on its own);
/// - tool results naming a `booking_id`/`car_id` are rewritten to a minimal
///   id list; tool results without ids are dropped.
pub fn sanitize(history: &[Message]) -> Vec<Message> {
    history
        .iter()
        .filter_map(|msg| match msg.role {
            Role::System | Role::User => Some(msg.clone()),
            Role::Assistant => {
                if msg.text().trim().is_empty() && !msg.tool_calls.is_empty() {
                    return None;
                }
                let mut kept = msg.clone();
                kept.tool_calls.clear();
                Some(kept)
            }
            Role::Tool => normalize_ids(msg.text()).map(|content| {
                Message::tool_result(
                    msg.tool_call_id.clone().unwrap_or_default(),
                    content,
                    msg.is_error,
                )
            }),
        })
        .collect()
}

/// Extracts booking/car ids from a tool payload. Returns `None` when the
/// payload references neither.
fn normalize_ids(content: &str) -> Option<String> {
    let mut extracted: Vec<Value> = Vec::new();
    for cap in BOOKING_ID_RE.captures_iter(content) {
        if let Ok(id) = cap[1].parse::<i64>() {
            extracted.push(json!({ "booking_id": id }));
        }
    }
    for cap in CAR_ID_RE.captures_iter(content) {
        if let Ok(id) = cap[1].parse::<i64>() {
            extracted.push(json!({ "car_id": id }));
        }
    }
    if extracted.is_empty() {
        None
    } else {
        Some(Value::Array(extracted).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ToolCall;
    use serde_json::json;

    fn tool_call(id: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: "car_search".to_string(),
            arguments: json!({}),
        }
    }

    #[test]
    fn normalizes_car_id_payloads() {
        let normalized =
            normalize_ids(r#"{"car_id": 7, "name": "Jaguar F-Type", "price": 140}"#).unwrap();
        assert_eq!(normalized, r#"[{"car_id":7}]"#);
    }

    #[test]
    fn extracts_booking_ids_before_car_ids() {
        let normalized =
            normalize_ids(r#"{"booking_id": 3, "car_id": 7, "total_price": 270}"#).unwrap();
        assert_eq!(normalized, r#"[{"booking_id":3},{"car_id":7}]"#);
    }

    #[test]
    fn payloads_without_ids_normalize_to_none() {
        assert_eq!(normalize_ids(r#"{"result": 270}"#), None);
    }

    #[test]
    fn middle_steps_are_removed_and_evidence_kept() {
        let history = vec![
            Message::user("find me a luxury car"),
            Message::assistant("", vec![tool_call("t1")], Some(900)),
            Message::tool_result("t1", r#"{"car_id": 7, "name": "Jaguar F-Type"}"#, false),
            Message::tool_result("t2", r#"{"result": 270}"#, false),
            Message::assistant("The Jaguar F-Type is available.", Vec::new(), Some(1200)),
        ];

        let cleaned = sanitize(&history);
        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned[0].role, Role::User);
        assert_eq!(cleaned[1].role, Role::Tool);
        assert_eq!(cleaned[1].text(), r#"[{"car_id":7}]"#);
        assert_eq!(cleaned[2].role, Role::Assistant);
        assert!(cleaned[2].tool_calls.is_empty());
    }

    #[test]
    fn run_is_a_noop_mid_exchange() {
        let user = crate::data::User {
            user_id: 101,
            name: "John Doe".into(),
            email: "john@example.com".into(),
            phone: "555-1234".into(),
            address: "123 Elm St".into(),
        };
        let mut thread = ConversationThread::ephemeral(user);
        thread
            .append(Message::user("find me a car"))
            .unwrap();
        thread
            .append(Message::assistant("", vec![tool_call("t1")], Some(900)))
            .unwrap();
        thread
            .append(Message::tool_result("t1", r#"{"car_id": 7}"#, false))
            .unwrap();

        // No substantive reply yet, nothing may be removed.
        run(&mut thread).unwrap();
        assert_eq!(thread.messages.len(), 3);

        thread
            .append(Message::assistant("Found one.", Vec::new(), Some(1100)))
            .unwrap();
        run(&mut thread).unwrap();
        assert_eq!(thread.messages.len(), 3);
        assert_eq!(thread.messages[1].text(), r#"[{"car_id":7}]"#);
    }
}
