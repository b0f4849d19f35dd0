//! Application Configuration
//!
//! Immutable configuration for the Auth application layer. Built once at
//! startup and shared behind an `Arc`.

use std::fmt;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;

use crate::domain::policy::{CredentialPolicy, password_rules, username_rules};
use crate::domain::value_object::code_purpose::CodePurpose;

/// Configuration errors detected at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unsupported JWT algorithm: {0} (expected HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),

    #[error("Missing secret: {0}")]
    MissingSecret(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Parse an HMAC algorithm name
pub fn parse_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    match name.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(ConfigError::UnsupportedAlgorithm(other.to_string())),
    }
}

/// JWT signing configuration
#[derive(Clone)]
pub struct TokenConfig {
    pub algorithm: Algorithm,
    pub access_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("algorithm", &self.algorithm)
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// One-time code configuration
#[derive(Debug, Clone)]
pub struct CodeConfig {
    pub length: usize,
    pub alphabet: String,
    pub email_confirm_window: Duration,
    pub reset_password_window: Duration,
}

impl CodeConfig {
    /// Active window of a code of `purpose`
    pub fn window(&self, purpose: CodePurpose) -> Duration {
        match purpose {
            CodePurpose::EmailConfirm => self.email_confirm_window,
            CodePurpose::ResetPassword => self.reset_password_window,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserNamePolicyConfig {
    pub min_length: usize,
    pub max_length: usize,
    /// Accepted in addition to ASCII letters and digits
    pub allowed_special_characters: String,
}

#[derive(Debug, Clone)]
pub struct PasswordPolicyConfig {
    pub min_length: usize,
    pub max_length: usize,
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub token: TokenConfig,
    pub code: CodeConfig,
    /// Delay before an unconfirmed registration is removed
    pub registration_check_delay: Duration,
    pub username_policy: UserNamePolicyConfig,
    pub password_policy: PasswordPolicyConfig,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Header carrying the bearer token
    pub auth_header: String,
    pub auth_header_prefix: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: TokenConfig {
                algorithm: Algorithm::HS256,
                access_secret: Vec::new(),
                refresh_secret: Vec::new(),
                access_ttl: Duration::from_secs(15 * 60), // 15 minutes
                refresh_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            },
            code: CodeConfig {
                length: 6,
                alphabet: "0123456789".to_string(),
                email_confirm_window: Duration::from_secs(120),
                reset_password_window: Duration::from_secs(300),
            },
            registration_check_delay: Duration::from_secs(24 * 3600),
            username_policy: UserNamePolicyConfig {
                min_length: 3,
                max_length: 35,
                allowed_special_characters: "_.-".to_string(),
            },
            password_policy: PasswordPolicyConfig {
                min_length: 8,
                max_length: 128,
            },
            password_pepper: None,
            auth_header: "Authorization".to_string(),
            auth_header_prefix: "Bearer".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with random signing secrets (for development)
    pub fn with_random_secrets() -> Self {
        let mut config = Self::default();
        config.token.access_secret = platform::crypto::random_bytes(32);
        config.token.refresh_secret = platform::crypto::random_bytes(32);
        config
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secrets()
    }

    /// Build the username and password rule sets
    pub fn credential_policy(&self) -> CredentialPolicy {
        CredentialPolicy::new(
            username_rules(
                self.username_policy.min_length,
                self.username_policy.max_length,
                &self.username_policy.allowed_special_characters,
            ),
            password_rules(
                self.password_policy.min_length,
                self.password_policy.max_length,
            ),
        )
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.access_secret.is_empty() {
            return Err(ConfigError::MissingSecret("ACCESS_SECRET_KEY"));
        }
        if self.token.refresh_secret.is_empty() {
            return Err(ConfigError::MissingSecret("REFRESH_SECRET_KEY"));
        }
        if self.token.access_ttl.is_zero() || self.token.refresh_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "token lifetime",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.code.length == 0 || self.code.alphabet.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "CONFIRMATION_CODE_LENGTH",
                reason: "codes need a positive length and a non-empty alphabet".to_string(),
            });
        }
        if self.username_policy.min_length > self.username_policy.max_length {
            return Err(ConfigError::InvalidValue {
                name: "USERNAME_MIN_LENGTH",
                reason: "greater than USERNAME_MAX_LENGTH".to_string(),
            });
        }
        if self.password_policy.min_length > self.password_policy.max_length {
            return Err(ConfigError::InvalidValue {
                name: "PASSWORD_MIN_LENGTH",
                reason: "greater than PASSWORD_MAX_LENGTH".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token)
            .field("code", &self.code)
            .field("registration_check_delay", &self.registration_check_delay)
            .field("username_policy", &self.username_policy)
            .field("password_policy", &self.password_policy)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .field("auth_header", &self.auth_header)
            .field("auth_header_prefix", &self.auth_header_prefix)
            .finish()
    }
}
