use thiserror::Error;

/// Errors produced by the auth gate.
///
/// Token failures deliberately collapse into [`AuthError::Unauthorized`] so
/// callers cannot tell an expired token from a forged one.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("The user credentials were incorrect")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}
