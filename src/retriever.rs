//! Embedding-based policy document retriever.
//!
//! The company policy file is split into `##` sections, each embedded once
//! through a hosted embedding endpoint and cached as `vectors.json` next to
//! the policy file. A lookup embeds the query and ranks sections by dot
//! product. Embedding is lazy: nothing touches the network until the first
//! query, so the app starts (and every other tool works) without an
//! embedding API key.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::OnceCell;

use crate::constants::EMBEDDING_MAX_CHARS;

/// A policy section with its similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredDoc {
    pub content: String,
    pub similarity: f32,
}

/// Ranked lookup over a fixed document set.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Returns the `k` documents most similar to `text`, best first.
    async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredDoc>>;
}

/// [`Retriever`] backed by a hosted embedding model.
pub struct EmbeddingRetriever {
    sections: Vec<String>,
    vectors: OnceCell<Vec<Vec<f32>>>,
    vectors_path: PathBuf,
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl EmbeddingRetriever {
    /// Loads the policy file and prepares (but does not yet compute) its
    /// section embeddings.
    pub fn from_policy_file(
        policy_path: &Path,
        vectors_path: PathBuf,
        endpoint: String,
        api_key: String,
    ) -> Result<Self> {
        let text = fs::read_to_string(policy_path)
            .with_context(|| format!("Failed to read policy file {:?}", policy_path))?;
        let sections = split_sections(&text);
        anyhow::ensure!(
            !sections.is_empty(),
            "Policy file {:?} contains no sections",
            policy_path
        );
        Ok(Self {
            sections,
            vectors: OnceCell::new(),
            vectors_path,
            http: reqwest::Client::new(),
            endpoint,
            api_key,
        })
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let snippet: String = text.chars().take(EMBEDDING_MAX_CHARS).collect();
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "inputs": snippet }))
            .send()
            .await
            .context("Embedding request failed")?;
        anyhow::ensure!(
            response.status().is_success(),
            "Embedding request failed with status {}",
            response.status()
        );
        response
            .json::<Vec<f32>>()
            .await
            .context("Unexpected embedding response structure")
    }

    /// Section embeddings, computed on first use and cached on disk.
    async fn section_vectors(&self) -> Result<&Vec<Vec<f32>>> {
        self.vectors
            .get_or_try_init(|| async {
                if let Some(cached) = self.load_cached_vectors() {
                    return Ok(cached);
                }
                log::info!("embedding {} policy sections", self.sections.len());
                let mut vectors = Vec::with_capacity(self.sections.len());
                for section in &self.sections {
                    vectors.push(self.embed(section).await?);
                }
                if let Err(e) = self.save_cached_vectors(&vectors) {
                    log::warn!("failed to cache policy vectors: {e:#}");
                }
                Ok(vectors)
            })
            .await
    }

    /// A cache is only valid while it matches the section count; a stale
    /// cache is re-embedded.
    fn load_cached_vectors(&self) -> Option<Vec<Vec<f32>>> {
        let contents = fs::read_to_string(&self.vectors_path).ok()?;
        let vectors: Vec<Vec<f32>> = serde_json::from_str(&contents).ok()?;
        (vectors.len() == self.sections.len()).then_some(vectors)
    }

    fn save_cached_vectors(&self, vectors: &[Vec<f32>]) -> Result<()> {
        let json = serde_json::to_string(vectors)?;
        fs::write(&self.vectors_path, json)
            .with_context(|| format!("Failed to write {:?}", self.vectors_path))
    }
}

#[async_trait::async_trait]
impl Retriever for EmbeddingRetriever {
    async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredDoc>> {
        let vectors = self.section_vectors().await?;
        let query_vector = self.embed(text).await?;

        let mut scored: Vec<ScoredDoc> = self
            .sections
            .iter()
            .zip(vectors)
            .map(|(section, vector)| ScoredDoc {
                content: section.clone(),
                similarity: dot(&query_vector, vector),
            })
            .collect();
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Splits a markdown document into chunks starting at each `##` heading.
/// Text before the first heading forms its own chunk.
fn split_sections(text: &str) -> Vec<String> {
    let mut sections: Vec<String> = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.starts_with("##") && !current.trim().is_empty() {
            sections.push(current.trim_end().to_string());
            current = String::new();
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        sections.push(current.trim_end().to_string());
    }
    sections
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
