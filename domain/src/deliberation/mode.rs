//! Response depth modes and their phase plans.
//!
//! Each [`Mode`] maps to one [`PhasePlan`] constant. The orchestrator only
//! ever reads the plan, so adding a mode means adding a plan here.
//!
//! | Mode        | Fast path | Roundtables        | Synthesis |
//! |-------------|-----------|--------------------|-----------|
//! | quick       | yes       | 0                  | none      |
//! | thoughtful  | no        | 1                  | standard  |
//! | contemplate | no        | 2                  | deep      |
//! | council     | no        | caller (default 2) | deep      |

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested depth of deliberation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One agent answers directly, no panel.
    Quick,
    /// Panel, one roundtable, standard synthesis.
    #[default]
    Thoughtful,
    /// Panel, two roundtables, deep synthesis.
    Contemplate,
    /// Like contemplate, with a caller-defined number of roundtables.
    Council,
}

/// Instruction variant given to the synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisDepth {
    Standard,
    Deep,
}

/// What a mode runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhasePlan {
    /// Bypass panel, roundtables and synthesis; a single agent answers.
    pub fast_path: bool,
    /// Roundtables after the panel round (only honoured with 2+ agents).
    pub roundtables: usize,
    /// Whether callers may replace `roundtables`.
    pub caller_defined_rounds: bool,
    /// Synthesis instruction, `None` when synthesis is skipped.
    pub synthesis: Option<SynthesisDepth>,
}

impl PhasePlan {
    /// Roundtables that actually run for a panel of `agent_count`.
    ///
    /// A roundtable with a single participant has no one to react to.
    pub fn roundtables_for(&self, agent_count: usize) -> usize {
        if agent_count > 1 { self.roundtables } else { 0 }
    }

    /// Replace the roundtable count when the plan allows it.
    pub fn with_roundtables(mut self, roundtables: usize) -> Self {
        if self.caller_defined_rounds {
            self.roundtables = roundtables;
        }
        self
    }
}

const QUICK_PLAN: PhasePlan = PhasePlan {
    fast_path: true,
    roundtables: 0,
    caller_defined_rounds: false,
    synthesis: None,
};

const THOUGHTFUL_PLAN: PhasePlan = PhasePlan {
    fast_path: false,
    roundtables: 1,
    caller_defined_rounds: false,
    synthesis: Some(SynthesisDepth::Standard),
};

const CONTEMPLATE_PLAN: PhasePlan = PhasePlan {
    fast_path: false,
    roundtables: 2,
    caller_defined_rounds: false,
    synthesis: Some(SynthesisDepth::Deep),
};

const COUNCIL_PLAN: PhasePlan = PhasePlan {
    fast_path: false,
    roundtables: 2,
    caller_defined_rounds: true,
    synthesis: Some(SynthesisDepth::Deep),
};

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Quick, Mode::Thoughtful, Mode::Contemplate, Mode::Council];

    /// Look up the phase plan for this mode.
    pub fn phase_plan(&self) -> PhasePlan {
        match self {
            Mode::Quick => QUICK_PLAN,
            Mode::Thoughtful => THOUGHTFUL_PLAN,
            Mode::Contemplate => CONTEMPLATE_PLAN,
            Mode::Council => COUNCIL_PLAN,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Quick => "quick",
            Mode::Thoughtful => "thoughtful",
            Mode::Contemplate => "contemplate",
            Mode::Council => "council",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Mode::Quick => "Quick: one agent answers directly",
            Mode::Thoughtful => "Thoughtful: panel + roundtable + synthesis",
            Mode::Contemplate => "Contemplate: panel + two roundtables + deep synthesis",
            Mode::Council => "Council: panel + configurable roundtables + deep synthesis",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick" | "q" => Ok(Mode::Quick),
            "thoughtful" | "t" => Ok(Mode::Thoughtful),
            "contemplate" | "c" => Ok(Mode::Contemplate),
            "council" => Ok(Mode::Council),
            _ => Err(DomainError::UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_quick_takes_the_fast_path() {
        for mode in Mode::ALL {
            let plan = mode.phase_plan();
            assert_eq!(plan.fast_path, mode == Mode::Quick, "{mode}");
            assert_eq!(plan.synthesis.is_none(), plan.fast_path, "{mode}");
        }
    }

    #[test]
    fn test_quick_plan_skips_everything() {
        let plan = Mode::Quick.phase_plan();
        assert!(plan.fast_path);
        assert_eq!(plan.roundtables, 0);
        assert_eq!(plan.synthesis, None);
    }

    #[test]
    fn test_thoughtful_and_contemplate_plans() {
        let thoughtful = Mode::Thoughtful.phase_plan();
        assert_eq!(thoughtful.roundtables, 1);
        assert_eq!(thoughtful.synthesis, Some(SynthesisDepth::Standard));

        let contemplate = Mode::Contemplate.phase_plan();
        assert_eq!(contemplate.roundtables, 2);
        assert_eq!(contemplate.synthesis, Some(SynthesisDepth::Deep));
    }

    #[test]
    fn test_single_agent_runs_no_roundtable() {
        assert_eq!(Mode::Contemplate.phase_plan().roundtables_for(1), 0);
        assert_eq!(Mode::Contemplate.phase_plan().roundtables_for(3), 2);
    }

    #[test]
    fn test_only_council_accepts_round_override() {
        assert_eq!(Mode::Council.phase_plan().with_roundtables(4).roundtables, 4);
        assert_eq!(
            Mode::Contemplate.phase_plan().with_roundtables(4).roundtables,
            2
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("quick".parse::<Mode>(), Ok(Mode::Quick));
        assert_eq!("Thoughtful".parse::<Mode>(), Ok(Mode::Thoughtful));
        assert_eq!(" c ".parse::<Mode>(), Ok(Mode::Contemplate));
        assert_eq!("council".parse::<Mode>(), Ok(Mode::Council));
        assert_eq!(
            "ponder".parse::<Mode>(),
            Err(DomainError::UnknownMode("ponder".to_string()))
        );
    }

    #[test]
    fn test_display_roundtrip() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>(), Ok(mode));
        }
    }
}
