//! Question value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The user question being deliberated (Value Object)
///
/// Guaranteed non-blank. Construction goes through [`Question::parse`] so an
/// empty question is rejected before any agent is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Question {
    content: String,
}

impl Question {
    /// Validate and wrap a question.
    pub fn parse(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question cannot be empty".to_string(),
            ));
        }
        Ok(Self { content })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Question {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Question::parse(s)
    }
}

impl TryFrom<&str> for Question {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Question::parse(s)
    }
}

impl From<Question> for String {
    fn from(q: Question) -> Self {
        q.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_content_verbatim() {
        let q = Question::parse("  What is the capital of France?").unwrap();
        assert_eq!(q.content(), "  What is the capital of France?");
    }

    #[test]
    fn test_blank_question_rejected() {
        assert!(matches!(
            Question::parse(""),
            Err(DomainError::InvalidQuestion(_))
        ));
        assert!(Question::parse(" \n\t").is_err());
    }

    #[test]
    fn test_deserialize_rejects_blank() {
        let ok: Result<Question, _> = serde_json::from_str("\"Why?\"");
        assert!(ok.is_ok());
        let err: Result<Question, _> = serde_json::from_str("\"   \"");
        assert!(err.is_err());
    }
}
