use serde::{Deserialize, Serialize};

/// One retrievable warranty fact and its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSnippet {
    pub text: String,
    pub embedding: Vec<f32>,
}
