//! Prompt context and streaming domain.
//!
//! - [`entities::Message`]: a single role-tagged message sent to a capability
//! - [`stream::StreamEvent`]: incremental output from a streaming capability

pub mod entities;
pub mod stream;
