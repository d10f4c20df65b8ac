//! JWT issue and validation

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use lyceum_types::{Role, UserId};

use crate::{AuthConfig, AuthError};

/// Whether a token grants access or only a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    /// Short-lived bearer token
    Access,
    /// Long-lived token exchangeable for a new access token
    Refresh,
}

/// Claims carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Account email
    pub email: String,
    /// Account role
    pub role: Role,
    /// Access or refresh
    pub token_use: TokenUse,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Parse the subject as a UserId
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        UserId::parse(&self.sub).map_err(|_| AuthError::InvalidToken)
    }
}

/// Issued access/refresh token pair
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token service: issues and validates HS256 JWT pairs
#[derive(Clone)]
pub struct TokenService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Create a new token service
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue an access/refresh pair for an authenticated user
    pub fn issue_pair(
        &self,
        user_id: UserId,
        email: &str,
        role: Role,
    ) -> Result<TokenPair, AuthError> {
        let access_token =
            self.encode_token(user_id, email, role, TokenUse::Access, self.config.access_ttl)?;
        let refresh_token = self.encode_token(
            user_id,
            email,
            role,
            TokenUse::Refresh,
            self.config.refresh_ttl,
        )?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Validate an access token and return its claims
    pub fn validate_access(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.decode_token(token)?;
        if claims.token_use != TokenUse::Access {
            return Err(AuthError::WrongTokenUse);
        }
        Ok(claims)
    }

    /// Exchange a refresh token for a fresh access token
    pub fn refresh_access(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.decode_token(refresh_token)?;
        if claims.token_use != TokenUse::Refresh {
            return Err(AuthError::WrongTokenUse);
        }

        let user_id = claims.user_id()?;
        self.encode_token(
            user_id,
            &claims.email,
            claims.role,
            TokenUse::Access,
            self.config.access_ttl,
        )
    }

    fn encode_token(
        &self,
        user_id: UserId,
        email: &str,
        role: Role,
        token_use: TokenUse,
        ttl: chrono::Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            token_use,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn service() -> TokenService {
        TokenService::new(AuthConfig::new("test-secret-key-for-token-tests"))
    }

    #[test]
    fn test_issue_and_validate_access() {
        let svc = service();
        let user_id = UserId::new();
        let pair = svc
            .issue_pair(user_id, "user@example.com", Role::User)
            .unwrap();

        let claims = svc.validate_access(&pair.access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let svc = service();
        let pair = svc
            .issue_pair(UserId::new(), "user@example.com", Role::User)
            .unwrap();

        let result = svc.validate_access(&pair.refresh_token);
        assert!(matches!(result, Err(AuthError::WrongTokenUse)));
    }

    #[test]
    fn test_access_token_rejected_for_refresh() {
        let svc = service();
        let pair = svc
            .issue_pair(UserId::new(), "user@example.com", Role::User)
            .unwrap();

        let result = svc.refresh_access(&pair.access_token);
        assert!(matches!(result, Err(AuthError::WrongTokenUse)));
    }

    #[test]
    fn test_refresh_yields_valid_access() {
        let svc = service();
        let pair = svc
            .issue_pair(UserId::new(), "moder@example.com", Role::Moderator)
            .unwrap();

        let access = svc.refresh_access(&pair.refresh_token).unwrap();
        let claims = svc.validate_access(&access).unwrap();
        assert_eq!(claims.role, Role::Moderator);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = AuthConfig::new("test-secret-key-for-token-tests")
            .with_ttls(Duration::seconds(-60), Duration::seconds(-60));
        let svc = TokenService::new(config);
        let pair = svc
            .issue_pair(UserId::new(), "user@example.com", Role::User)
            .unwrap();

        let result = svc.validate_access(&pair.access_token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = service();
        let other = TokenService::new(AuthConfig::new("a-completely-different-secret"));
        let pair = svc
            .issue_pair(UserId::new(), "user@example.com", Role::User)
            .unwrap();

        let result = other.validate_access(&pair.access_token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
