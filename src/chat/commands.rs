//! Slash commands available inside the chat REPL.

use anyhow::Result;
use colored::Colorize;

use crate::data::User;
use crate::format;
use crate::message::Role;
use crate::thread::ConversationThread;

/// What the REPL should do after a slash command.
pub enum CommandAction {
    /// Command handled, read the next line.
    Continue,
    /// Not a recognized command.
    Unknown(String),
}

/// Handles a line starting with `/`.
pub fn handle_slash_command(
    line: &str,
    thread: &mut ConversationThread,
    user: &User,
) -> Result<CommandAction> {
    let command = line.split_whitespace().next().unwrap_or(line);
    match command {
        "/new" => {
            *thread = ConversationThread::new(user.clone())?;
            let short = &thread.id[..8];
            println!("{} [thread: {}]", "new thread".bold().cyan(), short.yellow());
            Ok(CommandAction::Continue)
        }
        "/history" => {
            if thread.messages.is_empty() {
                println!("{}", "(no messages yet)".dimmed());
            }
            for msg in &thread.messages {
                if msg.role == Role::System {
                    continue;
                }
                println!("{}", format::format_message(msg));
                println!();
            }
            Ok(CommandAction::Continue)
        }
        "/threads" => {
            let threads = ConversationThread::list_all()?;
            if threads.is_empty() {
                println!("{}", "(no saved threads)".dimmed());
            }
            for meta in threads {
                let title = meta.title.unwrap_or_else(|| "(untitled)".to_string());
                println!(
                    "{} {} [user {}] {} messages",
                    (&meta.id[..8]).yellow(),
                    title,
                    meta.user_id,
                    meta.message_count,
                );
            }
            Ok(CommandAction::Continue)
        }
        "/help" => {
            println!("/new      start a fresh thread");
            println!("/history  show this thread's messages");
            println!("/threads  list saved threads");
            println!("/help     this text");
            Ok(CommandAction::Continue)
        }
        other => Ok(CommandAction::Unknown(other.to_string())),
    }
}
