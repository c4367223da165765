//! Shared utilities for use cases.
//!
//! Cancellation checking used at every phase boundary of a deliberation.

use council_domain::DomainError;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(DomainError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), DomainError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(DomainError::Cancelled);
    }
    Ok(())
}
