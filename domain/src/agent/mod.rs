//! Agent domain module
//!
//! An [`Agent`] is one configured voice on the panel: an identity, a
//! persona, and a reference to the text-generation capability that speaks
//! for it.

pub mod entities;

pub use entities::{Agent, AgentId, CapabilityRef, ensure_unique_ids};
