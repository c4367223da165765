//! Text-generation capability adapters.
//!
//! - [`ProcessGenerator`]: runs a configured command per request, speaking
//!   JSON on stdin and plain text on stdout.
//! - [`CapabilityRouter`]: name → generator table implementing
//!   [`CapabilityResolver`](council_application::CapabilityResolver).
//! - [`CommandClassifier`]: external question classifier run the same way.

mod classifier;
mod process;
mod router;

pub use classifier::CommandClassifier;
pub use process::ProcessGenerator;
pub use router::CapabilityRouter;
