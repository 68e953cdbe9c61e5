//! Unified error model for the authentication and gating surface.
//! Identity misses are represented as `Ok(None)` by the resolver, not as errors;
//! only configuration faults, verification failures and denials live here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// A protected operation was configured with an empty allow-list.
    /// This is a setup fault and must surface loudly, never a silent deny.
    #[error("gate misconfigured: {0}")]
    MisconfiguredGate(String),

    /// Valid principal, insufficient group membership, and the gate is set to raise.
    #[error("forbidden: principal lacks membership in any allowed group")]
    Forbidden,

    /// The external ticket-verification call failed outright.
    #[error("ticket verification failed: {0}")]
    Verification(#[from] anyhow::Error),

    /// The principal store refused a lookup, insert or save.
    #[error("principal store failure: {0}")]
    Store(#[source] anyhow::Error),
}

pub type AuthResult<T> = Result<T, AuthError>;
