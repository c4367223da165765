//! Question routing
//!
//! A classifier (external to this crate) scores each question and returns a
//! [`RoutingDecision`]. [`ModePolicy`] turns that signal into the depth mode
//! that actually runs.

pub mod decision;
pub mod policy;

pub use decision::RoutingDecision;
pub use policy::ModePolicy;
