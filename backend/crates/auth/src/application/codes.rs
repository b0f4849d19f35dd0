//! One-Time Codes
//!
//! [`CodeIssuer`] rate-limits issuance to one active code per
//! (user, purpose); [`CodeVerifier`] accepts only the most recent code while
//! it is active and unredeemed.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::application::config::AuthConfig;
use crate::domain::entity::{one_time_code::OneTimeCode, user::User};
use crate::domain::repository::CodeRepository;
use crate::domain::services::{MailMessage, MailSender};
use crate::domain::value_object::{
    code_purpose::CodePurpose, email::Email, user_id::UserId,
};
use crate::error::{AuthError, AuthResult};

/// Confirmation that a code went out by mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSent {
    pub email: String,
    pub message: String,
}

impl CodeSent {
    pub fn new(email: &Email) -> Self {
        Self {
            email: email.as_str().to_string(),
            message: format!("Code successfully sent to {}.", email.masked()),
        }
    }
}

/// How an issued code leaves the issuer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeDelivery {
    /// Mail it to the user and return [`CodeSent`]
    Mail,
    /// Hand the raw code back to the caller
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuedCode {
    Sent(CodeSent),
    Raw(String),
}

// ============================================================================
// Issuer
// ============================================================================

pub struct CodeIssuer<C>
where
    C: CodeRepository,
{
    code_repo: Arc<C>,
    mailer: Arc<dyn MailSender>,
    config: Arc<AuthConfig>,
}

impl<C> CodeIssuer<C>
where
    C: CodeRepository,
{
    pub fn new(code_repo: Arc<C>, mailer: Arc<dyn MailSender>, config: Arc<AuthConfig>) -> Self {
        Self {
            code_repo,
            mailer,
            config,
        }
    }

    /// Issue a new code unless one of the same purpose is still active
    ///
    /// ## Errors
    /// [`AuthError::CodeStillActive`] with the whole seconds until a new code
    /// may be obtained.
    pub async fn issue(
        &self,
        user: &User,
        purpose: CodePurpose,
        delivery: CodeDelivery,
    ) -> AuthResult<IssuedCode> {
        let stored = self.create(user, purpose).await?;

        match delivery {
            CodeDelivery::Raw => Ok(IssuedCode::Raw(stored.code)),
            CodeDelivery::Mail => Ok(IssuedCode::Sent(self.mail(user, &stored))),
        }
    }

    /// [`issue`](Self::issue) with mail delivery
    pub async fn send(&self, user: &User, purpose: CodePurpose) -> AuthResult<CodeSent> {
        match self.issue(user, purpose, CodeDelivery::Mail).await? {
            IssuedCode::Sent(sent) => Ok(sent),
            IssuedCode::Raw(_) => Err(AuthError::Internal(
                "Mail delivery returned a raw code".to_string(),
            )),
        }
    }

    /// Fresh random code for `user`; persisting it is up to the caller
    pub fn generate(&self, user: &User, purpose: CodePurpose) -> OneTimeCode {
        OneTimeCode::new(
            user.user_id,
            platform::crypto::random_string(self.config.code.length, &self.config.code.alphabet),
            purpose,
        )
    }

    /// Mail an already stored `code` to its owner
    pub fn mail(&self, user: &User, code: &OneTimeCode) -> CodeSent {
        self.mailer.send(MailMessage {
            recipients: vec![user.email.as_str().to_string()],
            subject: code.purpose.mail_subject().to_string(),
            body: code.purpose.mail_body(&code.code),
        });
        CodeSent::new(&user.email)
    }

    async fn create(&self, user: &User, purpose: CodePurpose) -> AuthResult<OneTimeCode> {
        let window = self.config.code.window(purpose);

        if let Some(last) = self
            .code_repo
            .find_most_recent_code(&user.user_id, purpose)
            .await?
        {
            let now = Utc::now();
            if last.is_active(window, now) {
                return Err(AuthError::CodeStillActive {
                    retry_after_secs: last.remaining_secs(window, now),
                });
            }
        }

        let code = self.generate(user, purpose);

        let Some(stored) = self.code_repo.create_code(&code, window).await? else {
            // A concurrent request stored a code between our read and insert.
            return Err(self.still_active(&user.user_id, purpose).await?);
        };

        tracing::info!(user_id = %user.user_id, purpose = %purpose, "One-time code issued");

        Ok(stored)
    }

    async fn still_active(&self, user_id: &UserId, purpose: CodePurpose) -> AuthResult<AuthError> {
        let window = self.config.code.window(purpose);
        let remaining = self
            .code_repo
            .find_most_recent_code(user_id, purpose)
            .await?
            .map(|code| code.remaining_secs(window, Utc::now()))
            .unwrap_or(0);

        Ok(AuthError::CodeStillActive {
            retry_after_secs: remaining.max(1),
        })
    }
}

// ============================================================================
// Verifier
// ============================================================================

pub struct CodeVerifier<C>
where
    C: CodeRepository,
{
    code_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> CodeVerifier<C>
where
    C: CodeRepository,
{
    pub fn new(code_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self { code_repo, config }
    }

    /// `true` iff the most recent code of `purpose` is active and equals `candidate`
    ///
    /// With `raise_on_failure` every failure (no code, expired, redeemed,
    /// mismatch) becomes the same [`AuthError::InvalidCode`].
    pub async fn verify(
        &self,
        user_id: &UserId,
        purpose: CodePurpose,
        candidate: &str,
        raise_on_failure: bool,
    ) -> AuthResult<bool> {
        if raise_on_failure {
            return self.accept(user_id, purpose, candidate).await.map(|_| true);
        }
        Ok(self.find_valid(user_id, purpose, candidate).await?.is_some())
    }

    /// The matching code, ready to be redeemed, or [`AuthError::InvalidCode`]
    pub async fn accept(
        &self,
        user_id: &UserId,
        purpose: CodePurpose,
        candidate: &str,
    ) -> AuthResult<OneTimeCode> {
        self.find_valid(user_id, purpose, candidate)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = %user_id, purpose = %purpose, "Code verification failed");
                AuthError::InvalidCode
            })
    }

    async fn find_valid(
        &self,
        user_id: &UserId,
        purpose: CodePurpose,
        candidate: &str,
    ) -> AuthResult<Option<OneTimeCode>> {
        let window = self.config.code.window(purpose);

        let code = self
            .code_repo
            .find_most_recent_code(user_id, purpose)
            .await?
            .filter(|code| {
                code.is_active(window, Utc::now())
                    && platform::crypto::constant_time_eq(code.code.as_bytes(), candidate.as_bytes())
            });

        Ok(code)
    }
}
