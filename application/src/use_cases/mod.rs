//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod invoke_agent;
pub mod panel_round;
pub mod roundtable;
pub mod run_deliberation;
pub(crate) mod shared;
pub mod synthesize;

#[cfg(test)]
pub(crate) mod test_support;
