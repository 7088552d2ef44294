//! Credential hashing, bearer tokens and the authorization gate.

pub mod gate;
pub mod password;
pub mod token;

pub use gate::{authorize, AuthUser};

use thiserror::Error;

/// Why a request was refused at the gate. The response never says which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing authorization token")]
    MissingToken,
    #[error("malformed authorization header")]
    MalformedToken,
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,
}
