//! Progress reporting for deliberation runs

use colored::Colorize;
use council_application::ProgressNotifier;
use council_domain::{Mode, Phase, RoundResponse};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with one indicatif bar per phase
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn agent_status(response: &RoundResponse) -> String {
        if response.is_success() {
            format!("{} {}", "v".green(), response.display_name)
        } else {
            format!("{} {}", "x".red(), response.display_name)
        }
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut bar) = self.phase_bar.lock() {
            f(&mut bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_mode_resolved(&self, requested: Option<Mode>, resolved: Mode) {
        if requested.is_some_and(|r| r != resolved) {
            let _ = self.multi.println(format!(
                "{} routed to {} mode",
                "->".cyan(),
                resolved.as_str().bold()
            ));
        }
    }

    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase.to_string());
        pb.set_message("Starting...");

        self.with_bar(|bar| *bar = Some(pb));
    }

    fn on_agent_complete(&self, _phase: &Phase, response: &RoundResponse) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.as_ref() {
                pb.set_message(Self::agent_status(response));
                pb.inc(1);
            }
        });
    }

    fn on_phase_complete(&self, phase: &Phase) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.take() {
                pb.finish_with_message(format!("{} complete!", phase.to_string().green()));
            }
        });
    }
}
