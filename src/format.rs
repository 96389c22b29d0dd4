//! Terminal formatting for conversation output.

use colored::Colorize;

use crate::message::{Message, Role};

/// Format a message for terminal display with role label and colors.
pub fn format_message(msg: &Message) -> String {
    let label = format_role_label(&msg.role);
    let body = format_body(msg.text(), &msg.role);
    format!("{}\n{}", label, body)
}

fn format_role_label(role: &Role) -> String {
    match role {
        Role::User => format!("{}", "you:".green().bold()),
        Role::Assistant => format!("{}", "renta:".cyan().bold()),
        Role::System => format!("{}", "system:".dimmed()),
        Role::Tool => format!("{}", "tool:".yellow()),
    }
}

fn format_body(text: &str, role: &Role) -> String {
    match role {
        Role::User => text.to_string(),
        Role::Assistant => render_markdown_lite(text),
        _ => text.dimmed().to_string(),
    }
}

/// Minimal markdown renderer for terminal output.
/// Not a full parser. Handles the three most common patterns
/// in LLM output: bold, inline code, and fenced code blocks.
pub fn render_markdown_lite(text: &str) -> String {
    let mut output = String::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if line.starts_with("```") {
            if in_code_block {
                in_code_block = false;
                output.push('\n');
            } else {
                in_code_block = true;
                let lang = line.trim_start_matches('`');
                if !lang.is_empty() {
                    output.push_str(&format!("  {}\n", lang.dimmed()));
                }
            }
            continue;
        }

        if in_code_block {
            output.push_str(&format!("  {}\n", line.dimmed()));
            continue;
        }

        output.push_str(&render_inline(line));
        output.push('\n');
    }

    if output.ends_with('\n') {
        output.pop();
    }
    output
}

/// Handle **bold** and `inline code` within a single line.
fn render_inline(line: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        if i + 1 < len && chars[i] == '*' && chars[i + 1] == '*' {
            if let Some(end) = find_closing(&chars, i + 2, "**") {
                let inner: String = chars[i + 2..end].iter().collect();
                result.push_str(&format!("{}", inner.bold()));
                i = end + 2;
                continue;
            }
        }
        if chars[i] == '`' {
            if let Some(end) = find_closing(&chars, i + 1, "`") {
                let inner: String = chars[i + 1..end].iter().collect();
                result.push_str(&format!("{}", inner.yellow()));
                i = end + 1;
                continue;
            }
        }
        result.push(chars[i]);
        i += 1;
    }
    result
}

/// Finds the start index of the next `marker` occurrence at or after `from`.
fn find_closing(chars: &[char], from: usize, marker: &str) -> Option<usize> {
    let marker: Vec<char> = marker.chars().collect();
    let mut i = from;
    while i + marker.len() <= chars.len() {
        if chars[i..i + marker.len()] == marker[..] {
            return Some(i);
        }
        i += 1;
    }
    None
}
