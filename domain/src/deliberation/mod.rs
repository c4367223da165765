//! Deliberation domain
//!
//! Types describing one run of the panel protocol:
//!
//! - [`mode::Mode`] and its [`mode::PhasePlan`] table
//! - [`entities::Phase`]: the step currently executing
//! - [`value_objects`]: per-agent responses, the transcript, and the final result

pub mod entities;
pub mod mode;
pub mod value_objects;
