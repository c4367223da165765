//! Prompt domain
//!
//! Builds the role-tagged prompt contexts for each phase of a deliberation.

mod template;

pub use template::{FAST_PATH_FALLBACK, PromptTemplate};
