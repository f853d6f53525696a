//! Shared test doubles for the server integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use warranty_core::config::RetrievalConfig;
use warranty_core::embeddings::{EmbeddingBackend, EmbeddingError};
use warranty_core::generation::{GenerationError, GenerativeModel};
use warranty_core::index::KnowledgeIndex;
use warranty_core::session_store::{MemorySessionStore, SessionStore};
use warranty_server::context::AppContext;
use warranty_server::subsystems::answer::AnswerGenerator;

pub const DIMS: usize = 256;

/// Deterministic bag-of-words embedder: each lowercase word is hashed
/// (FNV-1a) into one of `DIMS` buckets.
pub struct WordHashEmbedder {
    calls: AtomicUsize,
}

impl WordHashEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn bucket(word: &str) -> usize {
    let mut hash: u64 = 0xcbf29ce484222325;
    for b in word.bytes() {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % DIMS as u64) as usize
}

#[async_trait]
impl EmbeddingBackend for WordHashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut v = vec![0.0f32; DIMS];
        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            v[bucket(word)] += 1.0;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        DIMS
    }

    fn model(&self) -> &str {
        "word-hash-v1"
    }

    fn name(&self) -> &str {
        "word-hash"
    }
}

/// Generative model double: returns a fixed reply (or fails) and records prompts.
pub struct ScriptedModel {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(GenerationError::Api {
                code: 503,
                message: "The model is overloaded".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub struct TestApp {
    pub ctx: AppContext,
    pub index: Arc<KnowledgeIndex>,
    pub embedder: Arc<WordHashEmbedder>,
    pub model: Arc<ScriptedModel>,
    pub sessions: Arc<MemorySessionStore>,
}

/// Full pipeline over a real file-backed index in `dir`, an in-memory
/// session store and a scripted model.
pub fn test_app(dir: &Path, model: ScriptedModel) -> TestApp {
    let embedder = Arc::new(WordHashEmbedder::new());
    let index = Arc::new(KnowledgeIndex::new(
        dir.join("index.msgpack"),
        embedder.clone(),
        0.0,
    ));
    let model = Arc::new(model);
    let sessions = Arc::new(MemorySessionStore::new());

    let ctx = AppContext::new(
        RetrievalConfig::default(),
        index.clone(),
        sessions.clone() as Arc<dyn SessionStore>,
        AnswerGenerator::new(model.clone()),
    );

    TestApp {
        ctx,
        index,
        embedder,
        model,
        sessions,
    }
}
