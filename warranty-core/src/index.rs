//! Knowledge index: persisted, similarity-searchable warranty snippets
//!
//! The index lives in a single MessagePack file. On first use it is loaded
//! from disk; if that fails for any reason (missing, undecodable, built for a
//! different corpus or embedding model) the whole index is rebuilt from
//! `SEED_CORPUS` and written back. It is never partially repaired.
//!
//! Writes go to a unique temp file in the target directory followed by a
//! rename, so concurrent rebuilds are harmless: the last rename wins.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::embeddings::{EmbeddingBackend, EmbeddingError};
use crate::models::KnowledgeSnippet;
use crate::seed::{SEED_CORPUS, SEED_CORPUS_VERSION};

/// Layout version of the persisted file.
pub const INDEX_FORMAT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Index encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Incompatible index: {0}")]
    Incompatible(String),
}

/// Nearest-neighbor text search over warranty snippets.
#[async_trait]
pub trait SnippetSearch: Send + Sync {
    /// Up to `k` snippet texts, nearest first. Empty means "no relevant context".
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, IndexError>;

    /// Snippets currently loaded, for health output.
    async fn snippet_count(&self) -> usize;
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedIndex {
    format_version: u32,
    corpus_version: u32,
    embedding_model: String,
    dimensions: usize,
    built_at: DateTime<Utc>,
    snippets: Vec<KnowledgeSnippet>,
}

impl PersistedIndex {
    fn check_compatible(&self, backend: &dyn EmbeddingBackend) -> Result<(), IndexError> {
        if self.format_version != INDEX_FORMAT_VERSION {
            return Err(IndexError::Incompatible(format!(
                "format version {} (expected {})",
                self.format_version, INDEX_FORMAT_VERSION
            )));
        }
        if self.corpus_version != SEED_CORPUS_VERSION {
            return Err(IndexError::Incompatible(format!(
                "corpus version {} (expected {})",
                self.corpus_version, SEED_CORPUS_VERSION
            )));
        }
        if self.embedding_model != backend.model() || self.dimensions != backend.dimensions() {
            return Err(IndexError::Incompatible(format!(
                "built with {}/{}d, backend is {}/{}d",
                self.embedding_model,
                self.dimensions,
                backend.model(),
                backend.dimensions()
            )));
        }
        if self.snippets.is_empty() {
            return Err(IndexError::Incompatible("no snippets".to_string()));
        }
        if let Some(bad) = self
            .snippets
            .iter()
            .find(|s| s.embedding.len() != self.dimensions)
        {
            return Err(IndexError::Incompatible(format!(
                "snippet has {} dimensions: {}",
                bad.embedding.len(),
                bad.text
            )));
        }
        Ok(())
    }
}

/// File-backed knowledge index with brute-force cosine search.
pub struct KnowledgeIndex {
    path: PathBuf,
    backend: Arc<dyn EmbeddingBackend>,
    min_score: f32,
    snippets: RwLock<Option<Arc<Vec<KnowledgeSnippet>>>>,
}

impl KnowledgeIndex {
    /// Create an index handle. Nothing is read until the first search or
    /// an explicit `ensure_loaded`.
    pub fn new(path: impl Into<PathBuf>, backend: Arc<dyn EmbeddingBackend>, min_score: f32) -> Self {
        Self {
            path: path.into(),
            backend,
            min_score,
            snippets: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of loaded snippets, 0 before the first load.
    pub async fn len(&self) -> usize {
        self.snippets
            .read()
            .await
            .as_ref()
            .map(|s| s.len())
            .unwrap_or(0)
    }

    /// Load the persisted index, rebuilding from the seed corpus if it
    /// cannot be loaded. Runs once per handle.
    pub async fn ensure_loaded(&self) -> Result<Arc<Vec<KnowledgeSnippet>>, IndexError> {
        if let Some(snippets) = self.snippets.read().await.as_ref() {
            return Ok(Arc::clone(snippets));
        }

        let mut guard = self.snippets.write().await;
        if let Some(snippets) = guard.as_ref() {
            return Ok(Arc::clone(snippets));
        }

        let snippets = match self.load().await {
            Ok(snippets) => {
                tracing::info!(
                    path = %self.path.display(),
                    snippets = snippets.len(),
                    "Loaded knowledge index"
                );
                snippets
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Knowledge index unavailable, rebuilding from seed corpus"
                );
                self.build_and_persist().await?
            }
        };

        let snippets = Arc::new(snippets);
        *guard = Some(Arc::clone(&snippets));
        Ok(snippets)
    }

    /// Discard whatever is loaded and rebuild from the seed corpus.
    pub async fn rebuild(&self) -> Result<usize, IndexError> {
        let mut guard = self.snippets.write().await;
        let snippets = self.build_and_persist().await?;
        let count = snippets.len();
        *guard = Some(Arc::new(snippets));
        Ok(count)
    }

    async fn load(&self) -> Result<Vec<KnowledgeSnippet>, IndexError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let persisted: PersistedIndex = rmp_serde::from_slice(&bytes)?;
        persisted.check_compatible(self.backend.as_ref())?;
        Ok(persisted.snippets)
    }

    async fn build_and_persist(&self) -> Result<Vec<KnowledgeSnippet>, IndexError> {
        let mut snippets = Vec::with_capacity(SEED_CORPUS.len());
        for text in SEED_CORPUS {
            let embedding = self.backend.embed(text).await?;
            snippets.push(KnowledgeSnippet {
                text: (*text).to_string(),
                embedding,
            });
        }

        tracing::info!(
            backend = self.backend.name(),
            snippets = snippets.len(),
            "Rebuilt knowledge index from seed corpus"
        );

        let persisted = PersistedIndex {
            format_version: INDEX_FORMAT_VERSION,
            corpus_version: SEED_CORPUS_VERSION,
            embedding_model: self.backend.model().to_string(),
            dimensions: self.backend.dimensions(),
            built_at: Utc::now(),
            snippets,
        };

        // The rebuilt index is usable even if it cannot be written.
        if let Err(e) = self.persist(&persisted).await {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Failed to persist rebuilt knowledge index"
            );
        }

        Ok(persisted.snippets)
    }

    async fn persist(&self, persisted: &PersistedIndex) -> Result<(), IndexError> {
        let bytes = rmp_serde::to_vec_named(persisted)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "index".to_string());
        let tmp = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        tokio::fs::write(&tmp, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "Persisted knowledge index");
        Ok(())
    }
}

#[async_trait]
impl SnippetSearch for KnowledgeIndex {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, IndexError> {
        let query = query.trim();
        if query.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let snippets = self.ensure_loaded().await?;
        let query_vector = self.backend.embed_query(query).await?;

        if let Some(first) = snippets.first() {
            if first.embedding.len() != query_vector.len() {
                return Err(IndexError::Incompatible(format!(
                    "query has {} dimensions, index has {}",
                    query_vector.len(),
                    first.embedding.len()
                )));
            }
        }

        let mut scored: Vec<(f32, &KnowledgeSnippet)> = snippets
            .iter()
            .map(|s| (cosine_similarity(&query_vector, &s.embedding), s))
            .filter(|(score, _)| *score > self.min_score)
            .collect();

        // Stable sort keeps corpus order for equal scores.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let results: Vec<String> = scored
            .into_iter()
            .take(k)
            .map(|(_, s)| s.text.clone())
            .collect();

        tracing::debug!(k = k, hits = results.len(), "Knowledge index search");
        Ok(results)
    }

    async fn snippet_count(&self) -> usize {
        self.len().await
    }
}

/// Cosine similarity; 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

// ============================================================================
// TESTS
// ============================================================================
