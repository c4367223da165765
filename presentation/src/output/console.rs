//! Console output formatter for deliberation results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_domain::{RoundResponse, SynthesisResult, Transcript};

/// Formats deliberation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result
    pub fn format(result: &SynthesisResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Council Deliberation"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            result.question
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Mode:".cyan().bold(),
            result.mode.description()
        ));

        if let Some(transcript) = &result.transcript {
            output.push_str(&Self::format_transcript(transcript));
        }

        output.push_str(&Self::section_header("Answer"));
        output.push('\n');
        output.push_str(&result.answer);
        output.push('\n');

        if result.suggest_alt_opinion {
            output.push_str(&format!("\n{}\n", Self::alt_opinion_hint().dimmed()));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Every round, one section each
    pub fn format_transcript(transcript: &Transcript) -> String {
        let mut output = String::new();
        for (i, round) in transcript.rounds().iter().enumerate() {
            let title = if i == 0 {
                "Round 1: Panel".to_string()
            } else {
                format!("Round {}: Roundtable {}", i + 1, i)
            };
            output.push_str(&Self::section_header(&title));
            for response in round {
                output.push_str(&Self::format_response(response));
            }
        }
        output
    }

    fn format_response(response: &RoundResponse) -> String {
        match &response.outcome {
            Ok(content) => format!(
                "\n{}\n{}\n",
                format!("── {} ──", response.display_name).yellow().bold(),
                content
            ),
            Err(error) => format!(
                "\n{}\nError: {}\n",
                format!("── {} ──", response.display_name).red().bold(),
                error
            ),
        }
    }

    /// Format as JSON
    pub fn format_json(result: &SynthesisResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the answer alone (concise output)
    pub fn format_answer_only(result: &SynthesisResult) -> String {
        let mut output = result.answer.clone();
        output.push('\n');
        if result.suggest_alt_opinion {
            output.push_str(&format!("\n{}\n", Self::alt_opinion_hint().dimmed()));
        }
        output
    }

    fn alt_opinion_hint() -> &'static str {
        "This question may benefit from a second opinion; try --mode council."
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &SynthesisResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &SynthesisResult) -> String {
        Self::format_json(result)
    }

    fn format_answer_only(&self, result: &SynthesisResult) -> String {
        Self::format_answer_only(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{Agent, Mode};

    fn result_with_transcript() -> SynthesisResult {
        let a = Agent::new("a", "Optimist", "cap", "");
        let b = Agent::new("b", "Skeptic", "cap", "");
        let mut transcript = Transcript::new();
        transcript.push_round(vec![
            RoundResponse::success(&a, "It will work."),
            RoundResponse::failure(&b, "Timeout"),
        ]);
        transcript.push_round(vec![
            RoundResponse::success(&a, "Still confident."),
            RoundResponse::success(&b, "Doubtful."),
        ]);
        SynthesisResult::new("Will it work?", Mode::Thoughtful, "Probably.")
            .with_transcript(transcript)
    }

    #[test]
    fn test_full_format_lists_rounds_then_answer() {
        let text = ConsoleFormatter::format(&result_with_transcript());
        let round1 = text.find("Round 1: Panel").unwrap();
        let round2 = text.find("Round 2: Roundtable 1").unwrap();
        let answer = text.find("Probably.").unwrap();
        assert!(round1 < round2 && round2 < answer);
        assert!(text.contains("Error: Timeout"));
        assert!(text.contains("Doubtful."));
    }

    #[test]
    fn test_answer_only() {
        let result = SynthesisResult::new("q", Mode::Quick, "Paris");
        assert_eq!(ConsoleFormatter::format_answer_only(&result), "Paris\n");
    }

    #[test]
    fn test_alt_opinion_hint() {
        let result = SynthesisResult::new("q", Mode::Quick, "Paris").with_alt_opinion_hint(true);
        assert!(ConsoleFormatter::format_answer_only(&result).contains("second opinion"));
    }

    #[test]
    fn test_json_round_trips() {
        let result = result_with_transcript();
        let json = ConsoleFormatter::format_json(&result);
        let parsed: SynthesisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
