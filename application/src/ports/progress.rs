//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.

use council_domain::{Mode, Phase, RoundResponse};

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once the routing policy has fixed the mode
    fn on_mode_resolved(&self, _requested: Option<Mode>, _resolved: Mode) {}

    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called as each agent's invocation settles
    fn on_agent_complete(&self, phase: &Phase, response: &RoundResponse);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_agent_complete(&self, _phase: &Phase, _response: &RoundResponse) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
