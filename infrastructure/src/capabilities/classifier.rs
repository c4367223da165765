//! Question classifier backed by an external command.
//!
//! The command receives the question on stdin and prints a JSON
//! [`RoutingDecision`]. Only `complexity` and `confidence` are required.

use crate::config::FileClassifierConfig;
use async_trait::async_trait;
use council_application::QuestionClassifier;
use council_domain::RoutingDecision;
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Upper bound on one classification; routing must not hold up the answer.
pub const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct Verdict {
    #[serde(default)]
    question_type: String,
    complexity: f64,
    confidence: f64,
    #[serde(default)]
    recommended_agent: String,
    #[serde(default)]
    should_suggest_alt_opinion: bool,
}

impl From<Verdict> for RoutingDecision {
    fn from(v: Verdict) -> Self {
        RoutingDecision::new(v.question_type, v.complexity, v.confidence)
            .with_recommended_agent(v.recommended_agent)
            .with_alt_opinion(v.should_suggest_alt_opinion)
    }
}

pub struct CommandClassifier {
    config: FileClassifierConfig,
    timeout: Duration,
}

impl CommandClassifier {
    pub fn new(config: FileClassifierConfig) -> Self {
        Self {
            config,
            timeout: DEFAULT_CLASSIFY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Decision used when the classifier is unavailable: mid complexity,
    /// zero confidence, so the requested mode stands.
    pub fn neutral() -> RoutingDecision {
        RoutingDecision::new("unknown", 0.5, 0.0)
    }

    async fn run(&self, question: &str) -> Result<RoutingDecision, String> {
        let mut child = Command::new(&self.config.command)
            .args(&self.config.args)
            .envs(&self.config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to spawn {}: {}", self.config.command, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A classifier may exit without reading; its exit status decides.
            if let Err(e) = stdin.write_all(question.as_bytes()).await {
                debug!("Classifier stdin write failed: {}", e);
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| format!("failed to wait for {}: {}", self.config.command, e))?;
        if !output.status.success() {
            return Err(format!(
                "{} exited with {}: {}",
                self.config.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let verdict: Verdict = serde_json::from_slice(&output.stdout)
            .map_err(|e| format!("invalid classifier output: {}", e))?;
        Ok(verdict.into())
    }
}

#[async_trait]
impl QuestionClassifier for CommandClassifier {
    async fn classify(&self, question: &str) -> RoutingDecision {
        let outcome = match tokio::time::timeout(self.timeout, self.run(question)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(format!("timed out after {:?}", self.timeout)),
        };
        match outcome {
            Ok(decision) => {
                debug!(
                    "Classified as {} (complexity {:.2}, confidence {:.2})",
                    decision.question_type, decision.complexity, decision.confidence
                );
                decision
            }
            Err(e) => {
                warn!("Classifier failed, keeping requested mode: {}", e);
                Self::neutral()
            }
        }
    }
}
