//! Token Service
//!
//! Issues and decodes HMAC-signed JWTs for the access and refresh domains.
//! Revocation is not checked here; see [`AuthenticateUseCase`].
//!
//! [`AuthenticateUseCase`]: crate::application::authenticate::AuthenticateUseCase

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::value_object::token::{TokenDomain, TokenPair, TokenPayload};
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Wire claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
    /// Issue instant in unix microseconds
    created_at: i64,
    token_use: String,
}

#[derive(Clone)]
pub struct TokenService {
    config: Arc<AuthConfig>,
}

impl TokenService {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    fn secret(&self, domain: TokenDomain) -> &[u8] {
        match domain {
            TokenDomain::Access => &self.config.token.access_secret,
            TokenDomain::Refresh => &self.config.token.refresh_secret,
        }
    }

    fn ttl(&self, domain: TokenDomain) -> chrono::Duration {
        let ttl = match domain {
            TokenDomain::Access => self.config.token.access_ttl,
            TokenDomain::Refresh => self.config.token.refresh_ttl,
        };
        chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(3650))
    }

    /// Sign a token for `user_id` issued at `issued_at`
    pub fn issue_at(
        &self,
        user_id: &UserId,
        domain: TokenDomain,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        let expires_at = issued_at + self.ttl(domain);
        let claims = Claims {
            sub: *user_id.as_uuid(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            created_at: issued_at.timestamp_micros(),
            token_use: domain.as_claim().to_string(),
        };

        encode(
            &Header::new(self.config.token.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret(domain)),
        )
        .map_err(|e| AuthError::TokenEncoding(e.to_string()))
    }

    /// Access and refresh tokens issued now
    pub fn issue_pair(&self, user_id: &UserId) -> AuthResult<TokenPair> {
        let now = Utc::now();
        Ok(TokenPair {
            access: self.issue_at(user_id, TokenDomain::Access, now)?,
            refresh: self.issue_at(user_id, TokenDomain::Refresh, now)?,
        })
    }

    /// Verify signature, expiry and domain of `token`
    ///
    /// Every failure is reported as [`AuthError::InvalidToken`].
    pub fn decode(&self, token: &str, domain: TokenDomain) -> AuthResult<TokenPayload> {
        let mut validation = Validation::new(self.config.token.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret(domain)),
            &validation,
        )
        .map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    tracing::debug!(domain = %domain, "Token expired");
                }
                kind => {
                    tracing::debug!(domain = %domain, reason = ?kind, "Malformed token");
                }
            }
            AuthError::InvalidToken
        })?;

        let claims = data.claims;
        if claims.token_use != domain.as_claim() {
            tracing::debug!(domain = %domain, token_use = %claims.token_use, "Token domain mismatch");
            return Err(AuthError::InvalidToken);
        }

        let issued_at =
            DateTime::from_timestamp_micros(claims.created_at).ok_or(AuthError::InvalidToken)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::InvalidToken)?;

        Ok(TokenPayload {
            user_id: UserId::from_uuid(claims.sub),
            domain,
            issued_at,
            expires_at,
        })
    }
}
