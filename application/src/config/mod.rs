//! Application-level configuration.
//!
//! - [`DeliberationParams`]: static parameters for the deliberation use case
//!   (invocation timeout, council depth, sampling options)

pub mod deliberation_params;

pub use deliberation_params::DeliberationParams;
