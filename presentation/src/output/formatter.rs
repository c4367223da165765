//! Output formatter trait

use council_domain::SynthesisResult;

/// Trait for formatting deliberation results
pub trait OutputFormatter {
    /// Every recorded round followed by the answer
    fn format(&self, result: &SynthesisResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &SynthesisResult) -> String;

    /// The answer alone
    fn format_answer_only(&self, result: &SynthesisResult) -> String;
}
