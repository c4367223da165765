//! Mode selection from a routing decision.

use super::decision::RoutingDecision;
use crate::deliberation::mode::Mode;
use serde::{Deserialize, Serialize};

/// Thresholds that map measured complexity onto a depth mode.
///
/// Rules, in order:
///
/// 1. `quick` and `council` requests are honoured as-is.
/// 2. Without a decision the requested mode (or `default_mode`) runs.
/// 3. Without a requested mode, complexity picks one: below `quick_below`
///    → quick, at or above `contemplate_above` → contemplate, else
///    thoughtful.
/// 4. A requested thoughtful/contemplate is downgraded to quick when the
///    question is simple and the classifier is at least `min_confidence`.
/// 5. With `allow_upgrade`, a requested thoughtful is upgraded to
///    contemplate when the question is complex and confidence suffices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModePolicy {
    pub default_mode: Mode,
    pub quick_below: f64,
    pub contemplate_above: f64,
    pub min_confidence: f64,
    pub allow_upgrade: bool,
}

impl Default for ModePolicy {
    fn default() -> Self {
        Self {
            default_mode: Mode::Thoughtful,
            quick_below: 0.3,
            contemplate_above: 0.75,
            min_confidence: 0.6,
            allow_upgrade: false,
        }
    }
}

impl ModePolicy {
    pub fn with_default_mode(mut self, mode: Mode) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn with_upgrade(mut self, allow: bool) -> Self {
        self.allow_upgrade = allow;
        self
    }

    /// Pick the mode to execute.
    pub fn resolve(&self, requested: Option<Mode>, decision: Option<&RoutingDecision>) -> Mode {
        if let Some(mode @ (Mode::Quick | Mode::Council)) = requested {
            return mode;
        }

        let Some(decision) = decision else {
            return requested.unwrap_or(self.default_mode);
        };

        let simple = decision.complexity < self.quick_below;
        let complex = decision.complexity >= self.contemplate_above;
        let confident = decision.confidence >= self.min_confidence;

        match requested {
            None if simple => Mode::Quick,
            None if complex => Mode::Contemplate,
            None => Mode::Thoughtful,
            Some(_) if simple && confident => Mode::Quick,
            Some(Mode::Thoughtful) if complex && confident && self.allow_upgrade => {
                Mode::Contemplate
            }
            Some(mode) => mode,
        }
    }
}
