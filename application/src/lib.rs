//! Application layer for council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DeliberationParams;
pub use ports::{
    classifier::{FixedClassifier, QuestionClassifier},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{CapabilityResolver, GatewayError, GenerationOptions, StreamHandle, TextGenerator},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::invoke_agent::AgentInvoker;
pub use use_cases::panel_round::PanelRound;
pub use use_cases::roundtable::RoundtablePhase;
pub use use_cases::run_deliberation::{
    AskInput, DeliberationStream, RunDeliberationError, RunDeliberationUseCase,
};
pub use use_cases::synthesize::{SynthesisRequest, Synthesizer};
