//! Auth gate for the order API.
//!
//! Checks a single statically configured credential pair and issues
//! stateless HS256 bearer tokens. Nothing is stored server-side: a token is
//! valid exactly when its signature verifies and it has not expired.

mod claims;
mod error;
mod gate;

pub use claims::{Claims, TokenUse};
pub use error::AuthError;
pub use gate::{AuthGate, Credentials, IssuedTokens, Subject, TOKEN_TYPE};
