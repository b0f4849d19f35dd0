//! Domain Services
//!
//! Capabilities the use cases depend on but do not implement.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{user_id::UserId, user_password::UserPassword};
use crate::error::AuthResult;

/// Salted one-way hashing of clear-text credentials
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> AuthResult<UserPassword>;

    /// `false` for a wrong password and for a malformed stored hash
    fn verify(&self, plaintext: &str, hash: &UserPassword) -> bool;
}

/// Message handed to the mail collaborator
#[derive(Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl std::fmt::Debug for MailMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailMessage")
            .field("recipients", &self.recipients.len())
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

/// Fire-and-forget email delivery
pub trait MailSender: Send + Sync {
    fn send(&self, message: MailMessage);
}

/// Deferred "delete if still unconfirmed" check after registration
pub trait RegistrationScheduler: Send + Sync {
    fn schedule_check(&self, user_id: UserId, at: DateTime<Utc>);
}
