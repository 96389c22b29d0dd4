//! Handlers for the `threads` subcommand.

use anyhow::Result;
use colored::Colorize;

use super::ThreadAction;
use crate::thread::ConversationThread;

pub fn handle_threads(action: ThreadAction) -> Result<()> {
    match action {
        ThreadAction::List => {
            let threads = ConversationThread::list_all()?;
            if threads.is_empty() {
                println!("{}", "(no saved threads)".dimmed());
                return Ok(());
            }
            for meta in threads {
                let title = meta.title.unwrap_or_else(|| "(untitled)".to_string());
                println!(
                    "{}  {:<50} user {:<4} {:>3} messages  {}",
                    (&meta.id[..8]).yellow(),
                    title,
                    meta.user_id,
                    meta.message_count,
                    meta.updated_at.dimmed(),
                );
            }
            Ok(())
        }
        ThreadAction::Delete { id } => {
            let full_id = resolve_partial_id(&id)?;
            ConversationThread::delete(&full_id)?;
            println!("{} thread {}", "deleted".bold().red(), &full_id[..8]);
            Ok(())
        }
    }
}

/// Resolves a possibly-partial thread id to the unique full id.
fn resolve_partial_id(partial: &str) -> Result<String> {
    let threads = ConversationThread::list_all()?;
    let matches: Vec<_> = threads
        .iter()
        .filter(|t| t.id.starts_with(partial))
        .collect();
    match matches.as_slice() {
        [] => anyhow::bail!("No thread matching '{partial}'"),
        [single] => Ok(single.id.clone()),
        _ => anyhow::bail!("'{partial}' matches more than one thread, be more specific"),
    }
}
