//! Interactive support chat REPL for renta.
//!
//! Provides a multi-turn conversation loop using [`rustyline`] for readline
//! support (history, line editing). Each line of input goes through the
//! agent's single `respond` entry point, which blocks until the
//! orchestration loop produces a reply; the REPL then renders it with
//! markdown-lite formatting.

mod commands;

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::agent::Agent;
use crate::config::Config;
use crate::constants::DEFAULT_USER_ID;
use crate::data::DataStore;
use crate::format;
use crate::message::Role;
use crate::output::StdoutRenderer;
use crate::provider::{ChatModel, ModelSelection, Provider};
use crate::retriever::EmbeddingRetriever;
use crate::thread::ConversationThread;
use crate::tools::ToolRegistry;

/// Runs the interactive support chat.
///
/// Resolves the signed-in user from the users table, builds the provider,
/// retriever, and tool registry, and enters a readline loop. Every turn is
/// appended to a [`ConversationThread`] persisted as JSONL.
///
/// # Readline behavior
///
/// - **Ctrl+C**: cancels current input, stays in REPL
/// - **Ctrl+D**: exits cleanly with "goodbye."
/// - Readline history is persisted to `~/.cache/renta/chat_history.txt`
pub async fn run_chat(
    config: Config,
    user_id: Option<i64>,
    thread_id: Option<String>,
    selection: &ModelSelection,
) -> Result<()> {
    let store = DataStore::new(config.tables_dir()?);
    let user_id = user_id.unwrap_or(DEFAULT_USER_ID);
    let user = store.find_user(user_id)?.with_context(|| {
        format!("User {user_id} not found. Run `renta seed` to create the demo data.")
    })?;

    let provider = Provider::from_config(&config, selection)?;
    let model: Arc<dyn ChatModel> = Arc::new(provider);

    let retriever = EmbeddingRetriever::from_policy_file(
        &config.policy_path()?,
        config.vectors_path()?,
        config.retriever_endpoint(),
        config.retriever_api_key().unwrap_or_default(),
    )
    .context("Could not load the policy document. Run `renta seed` first")?;

    let tools = Arc::new(ToolRegistry::with_builtins(
        store.clone(),
        Arc::new(retriever),
    ));
    let agent = Agent::new(model, tools);

    // Create or resume the conversation thread
    let mut thread = if let Some(ref id) = thread_id {
        let t = ConversationThread::load(id, &store)?;
        let short = &t.id[..8];
        println!(
            "{} [thread: {}] [model: {}]",
            "resuming".bold().cyan(),
            short.yellow(),
            selection.model.yellow(),
        );
        println!();
        for msg in &t.messages {
            if msg.role == Role::System || msg.role == Role::Tool {
                continue;
            }
            println!("{}", format::format_message(msg));
            println!();
        }
        t
    } else {
        let t = ConversationThread::new(user.clone())?;
        let short = &t.id[..8];
        println!(
            "{} [thread: {}] [user: {}] [model: {}] (Ctrl+D to exit)",
            "renta support".bold().cyan(),
            short.yellow(),
            user.name.yellow(),
            selection.model.yellow(),
        );
        println!();
        t
    };

    // Set up readline with persistent history
    let mut rl = DefaultEditor::new()?;
    let history_path = Config::cache_dir()?.join(crate::constants::HISTORY_FILENAME);
    if history_path.exists() {
        let _ = rl.load_history(&history_path);
    }

    loop {
        let readline = rl.readline(&format!("{} ", ">".green().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                // Slash commands
                if line.starts_with('/') {
                    match commands::handle_slash_command(&line, &mut thread, &user)? {
                        commands::CommandAction::Continue => continue,
                        commands::CommandAction::Unknown(cmd) => {
                            println!("{} Unknown command: {}", "?".yellow(), cmd);
                            continue;
                        }
                    }
                }

                let _ = rl.add_history_entry(&line);
                println!();

                let mut renderer = StdoutRenderer::new();
                let reply = agent.respond(&mut thread, &line, &mut renderer).await;

                println!("{}", format::render_markdown_lite(&reply));
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "goodbye.".dimmed());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    // Save readline history
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}
