//! Prompt templates for the deliberation flow

use crate::agent::entities::Agent;
use crate::deliberation::mode::SynthesisDepth;
use crate::deliberation::value_objects::{RoundResponse, Transcript};
use crate::session::entities::{Message, PromptContext};

/// Answer returned by the fast path when the agent produced nothing.
pub const FAST_PATH_FALLBACK: &str =
    "I'm sorry, I wasn't able to come up with an answer to that just now. Please try asking again.";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Persona used when the synthesizer agent carries none of its own
    pub fn synthesis_system() -> &'static str {
        r#"You are the moderator of a panel of assistants who have each answered the user's question.
Your task is to:
1. Identify where the panel agrees
2. Weigh disagreements and favour the better-supported position
3. Merge the strongest elements into one clear, direct answer addressed to the user

Do not mention the panel, rounds, or internal errors unless they matter to the answer."#
    }

    /// Delimited block carrying caller-supplied private context.
    pub fn context_block(context: &str) -> String {
        format!(
            "=== USER-SPECIFIC CONTEXT (private, do not quote verbatim) ===\n{}\n=== END USER-SPECIFIC CONTEXT ===",
            context.trim_end()
        )
    }

    fn system_message(agent: &Agent, context: Option<&str>) -> Message {
        let mut system = agent.persona.clone();
        if let Some(ctx) = context.filter(|c| !c.trim().is_empty()) {
            if !system.is_empty() {
                system.push_str("\n\n");
            }
            system.push_str(&Self::context_block(ctx));
        }
        Message::system(system)
    }

    /// Prompt for the panel round (and the fast path).
    pub fn panel_context(agent: &Agent, question: &str, context: Option<&str>) -> PromptContext {
        vec![
            Self::system_message(agent, context),
            Message::user(question),
        ]
    }

    /// Prompt for one agent in a roundtable.
    ///
    /// The agent's own previous answer appears as its prior assistant turn;
    /// everyone else's is rendered by display name in the follow-up user
    /// turn. A failed previous answer is omitted rather than invented.
    pub fn roundtable_context(
        agent: &Agent,
        question: &str,
        context: Option<&str>,
        prior_round: &[RoundResponse],
    ) -> PromptContext {
        let mut messages = Self::panel_context(agent, question, context);

        if let Some(own) = prior_round
            .iter()
            .find(|r| r.agent_id == agent.id)
            .and_then(|r| r.outcome.as_ref().ok())
        {
            messages.push(Message::assistant(own.clone()));
        }

        messages.push(Message::user(Self::roundtable_prompt(agent, prior_round)));
        messages
    }

    fn roundtable_prompt(agent: &Agent, prior_round: &[RoundResponse]) -> String {
        let mut prompt = String::from("Other panelists answered the same question:\n");

        let others: Vec<_> = prior_round
            .iter()
            .filter(|r| r.agent_id != agent.id)
            .filter_map(|r| r.outcome.as_ref().ok().map(|c| (&r.display_name, c)))
            .collect();

        if others.is_empty() {
            prompt.push_str("\n(No other answers are available.)\n");
        }
        for (name, content) in others {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", name, content));
        }

        prompt.push_str(
            r#"
React to their answers: say where you agree, where you disagree and why, and extend or correct your own answer.
Keep it focused on the user's question."#,
        );
        prompt
    }

    /// Render every round for the synthesizer.
    pub fn render_transcript(transcript: &Transcript) -> String {
        let mut out = String::new();
        for (i, round) in transcript.rounds().iter().enumerate() {
            let title = if i == 0 {
                "Round 1: Initial answers".to_string()
            } else {
                format!("Round {}: Roundtable {}", i + 1, i)
            };
            out.push_str(&format!("## {}\n", title));
            for response in round {
                match &response.outcome {
                    Ok(content) => {
                        out.push_str(&format!("\n--- {} ---\n{}\n", response.display_name, content))
                    }
                    Err(error) => out.push_str(&format!(
                        "\n--- {} ---\n[Error - {}]\n",
                        response.display_name, error
                    )),
                }
            }
            out.push('\n');
        }
        out
    }

    /// User prompt for the synthesizer.
    pub fn synthesis_prompt(
        question: &str,
        transcript: &Transcript,
        context: Option<&str>,
        depth: SynthesisDepth,
    ) -> String {
        let mut prompt = format!("Original question: {}\n\n", question);

        if let Some(ctx) = context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str(&Self::context_block(ctx));
            prompt.push_str("\n\n");
        }

        prompt.push_str("Panel discussion:\n\n");
        prompt.push_str(&Self::render_transcript(transcript));

        prompt.push_str(match depth {
            SynthesisDepth::Standard => {
                "Synthesize the discussion above into a single answer for the user."
            }
            SynthesisDepth::Deep => {
                "This is a complex question. Take your time: work through the arguments raised in every round, resolve the disagreements explicitly, and then give the user a single, carefully reasoned answer."
            }
        });

        prompt
    }

    /// Full synthesis prompt context.
    pub fn synthesis_context(
        synthesizer: &Agent,
        question: &str,
        transcript: &Transcript,
        context: Option<&str>,
        depth: SynthesisDepth,
    ) -> PromptContext {
        let system = if synthesizer.persona.trim().is_empty() {
            Self::synthesis_system().to_string()
        } else {
            synthesizer.persona.clone()
        };
        vec![
            Message::system(system),
            Message::user(Self::synthesis_prompt(question, transcript, context, depth)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::Role;

    fn agents() -> Vec<Agent> {
        vec![
            Agent::new("a", "Alice", "cap", "You are Alice."),
            Agent::new("b", "Bob", "cap", "You are Bob."),
            Agent::new("c", "Carol", "cap", "You are Carol."),
        ]
    }

    #[test]
    fn test_panel_context_includes_persona_and_context() {
        let a = &agents()[0];
        let ctx = PromptTemplate::panel_context(a, "Why?", Some("likes cats"));
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx[0].role, Role::System);
        assert!(ctx[0].content.starts_with("You are Alice."));
        assert!(ctx[0].content.contains("likes cats"));
        assert!(ctx[0].content.contains("USER-SPECIFIC CONTEXT"));
        assert_eq!(ctx[1], Message::user("Why?"));
    }

    #[test]
    fn test_blank_context_is_not_rendered() {
        let a = &agents()[0];
        let ctx = PromptTemplate::panel_context(a, "Why?", Some("  "));
        assert_eq!(ctx[0].content, "You are Alice.");
    }

    #[test]
    fn test_roundtable_separates_own_and_others() {
        let agents = agents();
        let prior = vec![
            RoundResponse::success(&agents[0], "alice-answer"),
            RoundResponse::success(&agents[1], "bob-answer"),
            RoundResponse::success(&agents[2], "carol-answer"),
        ];
        let ctx = PromptTemplate::roundtable_context(&agents[0], "Q", None, &prior);

        assert_eq!(ctx.len(), 4);
        assert_eq!(ctx[2], Message::assistant("alice-answer"));
        let others = &ctx[3].content;
        assert!(others.contains("--- Bob ---\nbob-answer"));
        assert!(others.contains("--- Carol ---\ncarol-answer"));
        assert!(!others.contains("alice-answer"));
        assert!(others.contains("disagree"));
    }

    #[test]
    fn test_roundtable_omits_failed_prior_answer() {
        let agents = agents();
        let prior = vec![
            RoundResponse::failure(&agents[0], "timeout"),
            RoundResponse::success(&agents[1], "bob-answer"),
        ];
        let ctx = PromptTemplate::roundtable_context(&agents[0], "Q", None, &prior);

        assert!(ctx.iter().all(|m| m.role != Role::Assistant));
        assert!(ctx.iter().all(|m| !m.content.contains("timeout")));
        assert_eq!(ctx.len(), 3);
    }

    #[test]
    fn test_roundtable_skips_failed_others() {
        let agents = agents();
        let prior = vec![
            RoundResponse::success(&agents[0], "alice-answer"),
            RoundResponse::failure(&agents[1], "boom"),
        ];
        let ctx = PromptTemplate::roundtable_context(&agents[0], "Q", None, &prior);
        let last = &ctx.last().unwrap().content;
        assert!(!last.contains("Bob"));
        assert!(last.contains("No other answers"));
    }

    #[test]
    fn test_transcript_renders_error_marker() {
        let agents = agents();
        let mut t = Transcript::new();
        t.push_round(vec![
            RoundResponse::success(&agents[0], "first"),
            RoundResponse::failure(&agents[1], "rate limited"),
        ]);
        t.push_round(vec![RoundResponse::success(&agents[0], "second")]);

        let rendered = PromptTemplate::render_transcript(&t);
        assert!(rendered.contains("Round 1: Initial answers"));
        assert!(rendered.contains("Round 2: Roundtable 1"));
        assert!(rendered.contains("[Error - rate limited]"));
        assert!(rendered.contains("second"));
    }

    #[test]
    fn test_synthesis_instruction_depends_on_depth() {
        let t = Transcript::new();
        let standard = PromptTemplate::synthesis_prompt("Q", &t, None, SynthesisDepth::Standard);
        let deep = PromptTemplate::synthesis_prompt("Q", &t, Some("ctx"), SynthesisDepth::Deep);
        assert!(!standard.contains("Take your time"));
        assert!(deep.contains("Take your time"));
        assert!(deep.contains("ctx"));
        assert!(!standard.contains("USER-SPECIFIC"));
    }

    #[test]
    fn test_synthesizer_without_persona_uses_default() {
        let synth = Agent::new("s", "Synth", "cap", "");
        let ctx = PromptTemplate::synthesis_context(
            &synth,
            "Q",
            &Transcript::new(),
            None,
            SynthesisDepth::Standard,
        );
        assert_eq!(ctx[0].content, PromptTemplate::synthesis_system());
    }
}
