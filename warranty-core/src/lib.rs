pub mod config;
pub mod db;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod index;
pub mod models;
pub mod seed;
pub mod session_store;

pub use config::{SessionBackend, WarrantyConfig};
pub use embeddings::{
    EmbeddingBackend, EmbeddingError, GeminiEmbeddingClient, GeminiEmbeddingConfig,
    GEMINI_DIMENSIONS,
};
pub use error::WarrantyError;
pub use generation::{GeminiGenerationConfig, GeminiGenerativeClient, GenerationError, GenerativeModel};
pub use index::{IndexError, KnowledgeIndex, SnippetSearch};
pub use models::{ChatMessage, ChatSession, Role, TurnRequest, TurnResponse, ValidationError};
pub use session_store::{
    MemorySessionStore, NullSessionStore, PgSessionStore, SessionStore, SessionStoreError,
};
