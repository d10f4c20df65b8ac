//! Auth errors

use thiserror::Error;

/// Auth errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Email/password pair did not match an active account
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token failed signature or structural validation
    #[error("invalid token")]
    InvalidToken,

    /// Token is past its expiry
    #[error("token expired")]
    TokenExpired,

    /// A refresh token was presented where an access token was required,
    /// or vice versa
    #[error("wrong token type")]
    WrongTokenUse,

    /// Password hashing failure
    #[error("password hash error: {0}")]
    Hash(String),
}
