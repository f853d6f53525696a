pub mod session;
pub mod snippet;
pub mod turn;

pub use session::{ChatMessage, ChatSession, Role};
pub use snippet::KnowledgeSnippet;
pub use turn::{TurnRequest, TurnResponse, ValidationError};
