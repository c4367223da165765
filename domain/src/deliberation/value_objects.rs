//! Deliberation value objects - immutable result types for one request.
//!
//! - [`RoundResponse`] - One agent's outcome within a round
//! - [`Transcript`] - Every round of a run, in order
//! - [`SynthesisResult`] - The final answer returned to the caller

use super::mode::Mode;
use crate::agent::entities::{Agent, AgentId};
use serde::{Deserialize, Serialize};

/// One agent's outcome in a round.
///
/// The outcome is either the generated content or an error message, never
/// both. On the wire it keeps the flat `{ agent_id, content, error? }` shape
/// with `content` empty when `error` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RoundResponseRecord", into = "RoundResponseRecord")]
pub struct RoundResponse {
    pub agent_id: AgentId,
    pub display_name: String,
    pub outcome: Result<String, String>,
}

impl RoundResponse {
    /// Creates a successful response for `agent`.
    pub fn success(agent: &Agent, content: impl Into<String>) -> Self {
        Self {
            agent_id: agent.id.clone(),
            display_name: agent.display_name.clone(),
            outcome: Ok(content.into()),
        }
    }

    /// Creates a captured failure for `agent`.
    pub fn failure(agent: &Agent, error: impl Into<String>) -> Self {
        Self {
            agent_id: agent.id.clone(),
            display_name: agent.display_name.clone(),
            outcome: Err(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Generated text, or `""` for a failed entry.
    pub fn content(&self) -> &str {
        match &self.outcome {
            Ok(content) => content,
            Err(_) => "",
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(String::as_str)
    }
}

#[derive(Serialize, Deserialize)]
struct RoundResponseRecord {
    agent_id: AgentId,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<RoundResponseRecord> for RoundResponse {
    fn from(record: RoundResponseRecord) -> Self {
        Self {
            agent_id: record.agent_id,
            display_name: record.display_name,
            outcome: match record.error {
                Some(error) => Err(error),
                None => Ok(record.content),
            },
        }
    }
}

impl From<RoundResponse> for RoundResponseRecord {
    fn from(response: RoundResponse) -> Self {
        let (content, error) = match response.outcome {
            Ok(content) => (content, None),
            Err(error) => (String::new(), Some(error)),
        };
        Self {
            agent_id: response.agent_id,
            display_name: response.display_name,
            content,
            error,
        }
    }
}

/// Every round of one deliberation, oldest first.
///
/// Index 0 is the panel round; each following entry is a roundtable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    rounds: Vec<Vec<RoundResponse>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_round(&mut self, round: Vec<RoundResponse>) {
        self.rounds.push(round);
    }

    pub fn rounds(&self) -> &[Vec<RoundResponse>] {
        &self.rounds
    }

    pub fn last_round(&self) -> Option<&[RoundResponse]> {
        self.rounds.last().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Number of failed entries across all rounds.
    pub fn error_count(&self) -> usize {
        self.rounds
            .iter()
            .flatten()
            .filter(|r| !r.is_success())
            .count()
    }
}

/// Final outcome of a deliberation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// The original question
    pub question: String,
    /// Mode that actually ran, after routing policy
    pub mode: Mode,
    /// Answer shown to the user
    pub answer: String,
    /// Full transcript, only when the caller asked for it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Transcript>,
    /// Classifier hint that a second opinion may be worthwhile
    #[serde(default)]
    pub suggest_alt_opinion: bool,
}

impl SynthesisResult {
    pub fn new(question: impl Into<String>, mode: Mode, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            mode,
            answer: answer.into(),
            transcript: None,
            suggest_alt_opinion: false,
        }
    }

    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = Some(transcript);
        self
    }

    pub fn with_alt_opinion_hint(mut self, suggest: bool) -> Self {
        self.suggest_alt_opinion = suggest;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> Agent {
        Agent::new("historian", "Historian", "cap", "")
    }

    #[test]
    fn test_failure_has_empty_content() {
        let r = RoundResponse::failure(&agent(), "connection reset");
        assert!(!r.is_success());
        assert_eq!(r.content(), "");
        assert_eq!(r.error(), Some("connection reset"));
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let ok = serde_json::to_value(RoundResponse::success(&agent(), "Paris")).unwrap();
        assert_eq!(ok["agent_id"], "historian");
        assert_eq!(ok["content"], "Paris");
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(RoundResponse::failure(&agent(), "boom")).unwrap();
        assert_eq!(err["content"], "");
        assert_eq!(err["error"], "boom");
    }

    #[test]
    fn test_record_with_error_deserializes_as_failure() {
        let json = r#"{"agent_id":"a","content":"ignored","error":"timeout"}"#;
        let r: RoundResponse = serde_json::from_str(json).unwrap();
        assert_eq!(r.outcome, Err("timeout".to_string()));
    }

    #[test]
    fn test_transcript_counts_errors() {
        let mut t = Transcript::new();
        t.push_round(vec![
            RoundResponse::success(&agent(), "a"),
            RoundResponse::failure(&agent(), "x"),
        ]);
        t.push_round(vec![RoundResponse::failure(&agent(), "y")]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.error_count(), 2);
        assert_eq!(t.last_round().map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_result_omits_transcript_when_absent() {
        let result = SynthesisResult::new("Q", Mode::Quick, "Paris");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("transcript").is_none());
        assert_eq!(json["mode"], "quick");
    }
}
