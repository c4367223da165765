//! Domain layer for council
//!
//! This crate contains the entities and value objects of the deliberation
//! protocol. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! - **Agent**: one configured voice on the panel
//! - **Round**: every agent's [`RoundResponse`] to one prompt, in agent order
//! - **Transcript**: the panel round followed by any roundtables
//! - **Mode**: how deep the deliberation goes (quick / thoughtful /
//!   contemplate / council), resolved to a [`PhasePlan`]

pub mod agent;
pub mod core;
pub mod deliberation;
pub mod prompt;
pub mod routing;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use agent::{Agent, AgentId, CapabilityRef, ensure_unique_ids};
pub use core::{error::DomainError, question::Question};
pub use deliberation::{
    entities::Phase,
    mode::{Mode, PhasePlan, SynthesisDepth},
    value_objects::{RoundResponse, SynthesisResult, Transcript},
};
pub use prompt::{FAST_PATH_FALLBACK, PromptTemplate};
pub use routing::{ModePolicy, RoutingDecision};
pub use session::{
    entities::{Message, PromptContext, Role},
    stream::StreamEvent,
};
