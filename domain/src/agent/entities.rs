//! Agent entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identity of an agent within one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Name of a text-generation capability.
///
/// The domain never interprets it; a
/// `CapabilityResolver` in the application layer maps it to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityRef(String);

impl CapabilityRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CapabilityRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A panel member (Entity)
///
/// Immutable for the lifetime of a request and identified by [`AgentId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub display_name: String,
    pub capability: CapabilityRef,
    /// System instructions for this agent.
    pub persona: String,
}

impl Agent {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        capability: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            id: AgentId::new(id),
            display_name: display_name.into(),
            capability: CapabilityRef::new(capability),
            persona: persona.into(),
        }
    }
}

/// Reject agent lists that reuse an id.
///
/// Transcripts pair responses with agents by id, so a duplicate would make
/// the mapping ambiguous.
pub fn ensure_unique_ids(agents: &[Agent]) -> Result<(), DomainError> {
    let mut seen = HashSet::with_capacity(agents.len());
    for agent in agents {
        if !seen.insert(agent.id.as_str()) {
            return Err(DomainError::DuplicateAgentId(agent.id.to_string()));
        }
    }
    Ok(())
}
