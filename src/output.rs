//! Output rendering abstraction for renta.
//!
//! Defines the [`Renderer`] trait that decouples agent progress from the
//! display layer. The REPL uses [`StdoutRenderer`] to show tool activity
//! and retries as they happen; tests and non-interactive callers use
//! [`NullRenderer`].

use colored::Colorize;
use serde_json::Value;

use crate::tools::ToolResult;

/// Receives agent progress events during a `respond` call.
pub trait Renderer {
    /// A tool is about to be invoked.
    fn tool_start(&mut self, name: &str, args: &Value);

    /// A tool produced a result.
    fn tool_result(&mut self, name: &str, result: &ToolResult);

    /// The loop is retrying after a failed or unusable model response.
    fn retrying(&mut self, attempt: u32, reason: &str);
}

/// Renders agent progress directly to the terminal.
pub struct StdoutRenderer;

impl StdoutRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for StdoutRenderer {
    fn tool_start(&mut self, name: &str, args: &Value) {
        let mut args = args.to_string();
        if args.chars().count() > 120 {
            args = format!("{}...", args.chars().take(120).collect::<String>());
        }
        println!("{} {} {}", "→".yellow(), name.yellow(), args.dimmed());
    }

    fn tool_result(&mut self, name: &str, result: &ToolResult) {
        let marker = if result.is_error {
            "err".red().to_string()
        } else {
            "ok".green().to_string()
        };
        let mut content = result.content.replace('\n', " ");
        if content.chars().count() > 120 {
            content = format!("{}...", content.chars().take(120).collect::<String>());
        }
        println!("{} {} [{}] {}", "←".yellow(), name.yellow(), marker, content.dimmed());
    }

    fn retrying(&mut self, attempt: u32, reason: &str) {
        println!(
            "{}",
            format!("retrying ({attempt}): {reason}").dimmed()
        );
    }
}

/// Discards all progress events.
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn tool_start(&mut self, _name: &str, _args: &Value) {}
    fn tool_result(&mut self, _name: &str, _result: &ToolResult) {}
    fn retrying(&mut self, _attempt: u32, _reason: &str) {}
}
