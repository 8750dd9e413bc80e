//! Auth Service
//!
//! Token issuance and validation. Connection establishment refuses the
//! upgrade entirely on an invalid token, so nothing downstream of this
//! port ever sees an unauthenticated identity.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,
}

/// The auth port: maps a bearer token to a user identity.
pub trait AuthService: Send + Sync {
    /// Issue a signed session token for a user.
    fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Validate a token and return the user it identifies.
    fn validate_token(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued-at timestamp
    pub iat: i64,
}

/// HS256 JWT implementation of the auth port.
pub struct JwtAuthService {
    secret: String,
    token_expiry: Duration,
}

impl JwtAuthService {
    pub fn new(secret: String, token_expiry_minutes: i64) -> Self {
        Self {
            secret,
            token_expiry: Duration::minutes(token_expiry_minutes),
        }
    }
}

impl AuthService for JwtAuthService {
    fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.token_expiry).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| AuthError::InvalidToken)
    }

    fn validate_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        token_data
            .claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AuthError::InvalidToken)
    }
}
