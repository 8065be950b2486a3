use shared::store::StoreError;
use thiserror::Error;

/// Session errors
///
/// Every variant is recoverable: the user re-triggers the action or
/// navigates away. Partial saga progress (a created table or order)
/// stays cached in the session, so retries never duplicate either.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Collaborator call failed; surfaced once, no automatic retry
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Table or order creation failed mid-saga
    #[error("Provisioning failed: {0}")]
    Provisioning(String),

    /// Collaborator data cannot be reconciled with local state
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),

    /// Operation not valid in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Session was torn down; no further mutation is allowed
    #[error("Session is torn down")]
    TornDown,
}

pub type SessionResult<T> = Result<T, SessionError>;
