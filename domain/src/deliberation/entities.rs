//! Deliberation phases

use serde::{Deserialize, Serialize};
use std::fmt;

/// Step of a deliberation run, reported to progress listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Quick mode: a single agent answers directly.
    FastPath,
    /// Every agent answers the question independently.
    Panel,
    /// Agents react to each other's previous answers (1-based index).
    Roundtable(usize),
    /// The synthesizer merges the transcript into one answer.
    Synthesis,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::FastPath => "fast_path",
            Phase::Panel => "panel",
            Phase::Roundtable(_) => "roundtable",
            Phase::Synthesis => "synthesis",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::FastPath => write!(f, "Quick Answer"),
            Phase::Panel => write!(f, "Panel"),
            Phase::Roundtable(n) => write!(f, "Roundtable {}", n),
            Phase::Synthesis => write!(f, "Synthesis"),
        }
    }
}
