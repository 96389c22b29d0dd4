//! Conversation thread store.
//!
//! Each thread is one user-facing conversation: an ordered message history
//! tied to the user context captured at creation. Threads are stored as
//! JSONL files under `~/.local/share/renta/threads/`, with a
//! `threads/index.json` file maintaining metadata keyed by thread id.
//! JSONL is crash-safe (append-only) and human-readable; the history
//! sanitizer is the only component that rewrites a thread wholesale.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::data::{DataStore, User};
use crate::message::{Message, Role};

/// Metadata for a single thread, stored in the thread index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMeta {
    pub id: String,
    pub user_id: i64,
    pub title: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub message_count: usize,
}

/// Index of all threads, persisted as `index.json`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ThreadIndex {
    pub threads: Vec<ThreadMeta>,
}

/// One conversation's ordered message history and user context.
///
/// The thread exclusively owns its message sequence. The user context is
/// captured once at creation and never changes; signing in as a different
/// user means starting a new thread.
pub struct ConversationThread {
    pub id: String,
    pub user: User,
    pub messages: Vec<Message>,
    file_path: PathBuf,
    /// Disabled for ephemeral (test) threads.
    persist: bool,
}

impl ConversationThread {
    /// Creates a new thread for a user with a UUID v4 identifier.
    pub fn new(user: User) -> Result<Self> {
        let id = Uuid::new_v4().to_string();
        let dir = Self::threads_dir()?;
        fs::create_dir_all(&dir).context("Failed to create threads directory")?;
        let file_path = Self::thread_path(&id)?;

        Ok(Self {
            id,
            user,
            messages: Vec::new(),
            file_path,
            persist: true,
        })
    }

    /// Loads an existing thread from its JSONL file, resolving the user
    /// context from the data store via the indexed user id.
    pub fn load(id: &str, store: &DataStore) -> Result<Self> {
        let file_path = Self::thread_path(id)?;
        let short = &id[..8.min(id.len())];
        anyhow::ensure!(file_path.exists(), "Thread {} not found", short);

        let index = Self::load_index()?;
        let user_id = index
            .threads
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.user_id)
            .with_context(|| format!("Thread {} missing from index", short))?;
        let user = store
            .find_user(user_id)?
            .with_context(|| format!("User {} for thread {} no longer exists", user_id, short))?;

        let file = fs::File::open(&file_path)
            .with_context(|| format!("Failed to open thread file {:?}", file_path))?;
        let reader = BufReader::new(file);
        let mut messages = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let msg: Message = serde_json::from_str(&line)
                .with_context(|| "Failed to parse message from thread file")?;
            messages.push(msg);
        }

        Ok(Self {
            id: id.to_string(),
            user,
            messages,
            file_path,
            persist: true,
        })
    }

    /// Appends a message to the thread.
    ///
    /// The message always lands in the in-memory history; the returned
    /// error only reflects persistence problems (disk write or index
    /// update), which callers on the conversation path may log and ignore.
    pub fn append(&mut self, msg: Message) -> Result<()> {
        let line = serde_json::to_string(&msg);
        self.messages.push(msg);
        if !self.persist {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .with_context(|| format!("Failed to open thread file {:?}", self.file_path))?;
        writeln!(file, "{}", line?)?;
        file.flush()?;

        self.update_index()?;
        Ok(())
    }

    /// The full ordered history.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// Replaces the whole message sequence (the sanitizer's compaction
    /// path) and rewrites the JSONL file to match.
    pub fn replace(&mut self, messages: Vec<Message>) -> Result<()> {
        self.messages = messages;
        if !self.persist {
            return Ok(());
        }

        let mut lines = String::new();
        for msg in &self.messages {
            lines.push_str(&serde_json::to_string(msg)?);
            lines.push('\n');
        }
        fs::write(&self.file_path, lines)
            .with_context(|| format!("Failed to rewrite thread file {:?}", self.file_path))?;

        self.update_index()?;
        Ok(())
    }

    /// Returns the thread title derived from the first user message.
    ///
    /// Truncates to 50 characters. Returns `None` if no user message exists.
    pub fn title(&self) -> Option<String> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| {
                let text = m.text();
                if text.chars().count() > 50 {
                    let truncated: String = text.chars().take(50).collect();
                    format!("{}...", truncated)
                } else {
                    text.to_string()
                }
            })
    }

    /// Updates (or creates) this thread's entry in the index file.
    fn update_index(&self) -> Result<()> {
        let mut index = Self::load_index()?;
        let now = Utc::now().to_rfc3339();

        if let Some(entry) = index.threads.iter_mut().find(|t| t.id == self.id) {
            entry.title = self.title();
            entry.updated_at = now;
            entry.message_count = self.messages.len();
        } else {
            index.threads.push(ThreadMeta {
                id: self.id.clone(),
                user_id: self.user.user_id,
                title: self.title(),
                created_at: now.clone(),
                updated_at: now,
                message_count: self.messages.len(),
            });
        }

        let path = Self::index_path()?;
        let json = serde_json::to_string_pretty(&index)?;
        fs::write(&path, json).with_context(|| "Failed to write thread index")?;

        Ok(())
    }

    /// Loads the thread index, returning a default empty index if the file doesn't exist.
    fn load_index() -> Result<ThreadIndex> {
        let path = Self::index_path()?;
        if !path.exists() {
            return Ok(ThreadIndex::default());
        }
        let contents = fs::read_to_string(&path).with_context(|| "Failed to read thread index")?;
        let index: ThreadIndex =
            serde_json::from_str(&contents).with_context(|| "Failed to parse thread index")?;
        Ok(index)
    }

    /// Returns the threads directory path (`~/.local/share/renta/threads/`).
    fn threads_dir() -> Result<PathBuf> {
        Ok(Config::data_dir()?.join("threads"))
    }

    /// Returns the JSONL file path for a given thread ID.
    fn thread_path(id: &str) -> Result<PathBuf> {
        Ok(Self::threads_dir()?.join(format!("{}.jsonl", id)))
    }

    /// Returns the path to the thread index file.
    fn index_path() -> Result<PathBuf> {
        Ok(Self::threads_dir()?.join("index.json"))
    }

    /// Returns metadata for all threads.
    pub fn list_all() -> Result<Vec<ThreadMeta>> {
        let index = Self::load_index()?;
        Ok(index.threads)
    }

    /// Deletes a thread's JSONL file and removes it from the index
    /// (eviction at logout or cleanup).
    pub fn delete(id: &str) -> Result<()> {
        let path = Self::thread_path(id)?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete thread file {:?}", path))?;
        }

        let mut index = Self::load_index()?;
        index.threads.retain(|t| t.id != id);

        let index_path = Self::index_path()?;
        let dir = Self::threads_dir()?;
        if dir.exists() {
            let json = serde_json::to_string_pretty(&index)?;
            fs::write(&index_path, json).with_context(|| "Failed to update thread index")?;
        }

        Ok(())
    }

    /// An in-memory thread for tests, never persisted.
    #[cfg(test)]
    pub fn ephemeral(user: User) -> Self {
        let id = Uuid::new_v4().to_string();
        let file_path = std::env::temp_dir().join(format!("renta_thread_{}.jsonl", id));
        Self {
            id,
            user,
            messages: Vec::new(),
            file_path,
            persist: false,
        }
    }
}
