//! Lyceum Auth Core - Credential and token handling
//!
//! Password hashing (Argon2) and JWT pair issue/validation for the catalog
//! service. Tokens are signed locally with HS256; an access token is good
//! for 15 minutes, a refresh token for 24 hours.
//!
//! # Example
//!
//! ```rust,ignore
//! use lyceum_auth_core::{AuthConfig, TokenService};
//!
//! let tokens = TokenService::new(AuthConfig::new("super-secret-signing-key"));
//! let pair = tokens.issue_pair(user_id, "user@example.com", Role::User)?;
//! let claims = tokens.validate_access(&pair.access_token)?;
//! ```

pub mod config;
pub mod error;
pub mod password;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenPair, TokenService, TokenUse};
