use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// One inbound user turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    pub question: String,
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub answer: String,
    pub session_id: Uuid,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No prompt provided")]
    MissingQuestion,

    #[error("No user ID provided")]
    MissingUserId,

    #[error("No username provided")]
    MissingDisplayName,
}

impl TurnRequest {
    /// Caller-side check run before a turn reaches the pipeline.
    /// The question is trimmed; blank fields are treated as missing.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.question = self.question.trim().to_string();
        if self.question.is_empty() {
            return Err(ValidationError::MissingQuestion);
        }
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingUserId);
        }
        if self.display_name.trim().is_empty() {
            return Err(ValidationError::MissingDisplayName);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(question: &str, user_id: &str, name: &str) -> TurnRequest {
        TurnRequest {
            question: question.to_string(),
            user_id: user_id.to_string(),
            display_name: name.to_string(),
            session_id: None,
        }
    }

    #[test]
    fn test_validate_trims_question() {
        let req = request("  hi  ", "u-1", "Alice").validate().unwrap();
        assert_eq!(req.question, "hi");
    }

    #[test]
    fn test_validate_rejects_missing_fields_in_order() {
        assert_eq!(
            request("   ", "", "").validate().unwrap_err(),
            ValidationError::MissingQuestion
        );
        assert_eq!(
            request("hi", "", "Alice").validate().unwrap_err(),
            ValidationError::MissingUserId
        );
        assert_eq!(
            request("hi", "u-1", " ").validate().unwrap_err(),
            ValidationError::MissingDisplayName
        );
    }
}
