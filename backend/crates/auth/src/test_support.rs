//! In-memory collaborators for use-case tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::{one_time_code::OneTimeCode, user::User};
use crate::domain::policy::CredentialPolicy;
use crate::domain::repository::{CodeRepository, UserChanges, UserRepository};
use crate::domain::services::{MailMessage, MailSender, PasswordHasher, RegistrationScheduler};
use crate::domain::value_object::{
    code_purpose::CodePurpose, email::Email, user_id::UserId, user_name::UserName,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Store
// ============================================================================

#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<User>>,
    codes: Mutex<Vec<OneTimeCode>>,
    calls: AtomicUsize,
    updates: AtomicUsize,
}

impl InMemoryStore {
    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of repository calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn user(&self, user_id: &UserId) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user_id == *user_id)
            .cloned()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn insert_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn code_count(&self, user_id: &UserId, purpose: CodePurpose) -> usize {
        self.codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == *user_id && c.purpose == purpose)
            .count()
    }

    pub fn latest_code(&self, user_id: &UserId, purpose: CodePurpose) -> Option<String> {
        self.latest(user_id, purpose).map(|c| c.code)
    }

    /// Move every stored code of (user, purpose) `secs` into the past
    pub fn age_codes(&self, user_id: &UserId, purpose: CodePurpose, secs: i64) {
        for code in self.codes.lock().unwrap().iter_mut() {
            if code.user_id == *user_id && code.purpose == purpose {
                code.created_at -= chrono::Duration::seconds(secs);
            }
        }
    }

    fn latest(&self, user_id: &UserId, purpose: CodePurpose) -> Option<OneTimeCode> {
        self.codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == *user_id && c.purpose == purpose)
            .max_by_key(|c| c.created_at)
            .cloned()
    }

    /// Number of `update` calls so far
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

fn apply_changes(users: &mut [User], user_id: &UserId, changes: UserChanges) -> AuthResult<()> {
    let user = users
        .iter_mut()
        .find(|u| u.user_id == *user_id)
        .ok_or(AuthError::UserNotFound)?;

    if let Some(hash) = changes.password_hash {
        user.password_hash = hash;
    }
    if let Some(confirmed) = changes.email_confirmed {
        user.email_confirmed = confirmed;
    }
    if let Some(watermark) = changes.tokens_revoked_at {
        user.tokens_revoked_at = Some(watermark);
    }
    if let Some(active) = changes.is_active {
        user.is_active = active;
    }
    user.updated_at = Utc::now();
    Ok(())
}

impl UserRepository for InMemoryStore {
    async fn create_with_code(&self, user: &User, code: &OneTimeCode) -> AuthResult<()> {
        self.touch();
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        if users
            .iter()
            .any(|u| u.user_name.canonical() == user.user_name.canonical())
        {
            return Err(AuthError::UserNameTaken);
        }
        users.push(user.clone());
        self.codes.lock().unwrap().push(code.clone());
        Ok(())
    }

    async fn update(&self, user_id: &UserId, changes: UserChanges) -> AuthResult<()> {
        self.touch();
        self.updates.fetch_add(1, Ordering::SeqCst);
        apply_changes(&mut self.users.lock().unwrap(), user_id, changes)
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        self.touch();
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.user_id != *user_id);
        let removed = users.len() != before;
        drop(users);

        if removed {
            self.codes.lock().unwrap().retain(|c| c.user_id != *user_id);
        }
        Ok(removed)
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        self.touch();
        Ok(self.users.lock().unwrap().iter().any(|u| u.email == *email))
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        self.touch();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.user_name.canonical() == user_name.canonical()))
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        self.touch();
        Ok(self.user(user_id))
    }

    async fn find_by_login(&self, login: &str) -> AuthResult<Option<User>> {
        self.touch();
        let login = login.to_lowercase();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| {
                u.email_confirmed
                    && (u.user_name.canonical() == login || u.email.as_str() == login)
            })
            .cloned())
    }

    async fn find_by_email(
        &self,
        email: &Email,
        include_unconfirmed: bool,
    ) -> AuthResult<Option<User>> {
        self.touch();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == *email && (include_unconfirmed || u.email_confirmed))
            .cloned())
    }

    async fn delete_unconfirmed_before(&self, cutoff: DateTime<Utc>) -> AuthResult<u64> {
        self.touch();
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.email_confirmed || u.created_at >= cutoff);
        Ok((before - users.len()) as u64)
    }
}

impl CodeRepository for InMemoryStore {
    async fn create_code(
        &self,
        code: &OneTimeCode,
        active_window: Duration,
    ) -> AuthResult<Option<OneTimeCode>> {
        self.touch();
        let cutoff = code.created_at - chrono::Duration::from_std(active_window).unwrap();
        let mut codes = self.codes.lock().unwrap();
        let active = codes.iter().any(|c| {
            c.user_id == code.user_id
                && c.purpose == code.purpose
                && c.consumed_at.is_none()
                && c.created_at > cutoff
        });
        if active {
            return Ok(None);
        }
        codes.push(code.clone());
        Ok(Some(code.clone()))
    }

    async fn find_most_recent_code(
        &self,
        user_id: &UserId,
        purpose: CodePurpose,
    ) -> AuthResult<Option<OneTimeCode>> {
        self.touch();
        Ok(self.latest(user_id, purpose))
    }

    async fn redeem_code(&self, code: &OneTimeCode, changes: UserChanges) -> AuthResult<bool> {
        self.touch();
        let mut users = self.users.lock().unwrap();
        let mut codes = self.codes.lock().unwrap();
        let Some(stored) = codes
            .iter_mut()
            .find(|c| c.code_id == code.code_id && c.consumed_at.is_none())
        else {
            return Ok(false);
        };

        apply_changes(&mut users, &code.user_id, changes)?;
        stored.consumed_at = Some(Utc::now());
        Ok(true)
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// Reversible stand-in for Argon2 that counts its calls
#[derive(Default)]
pub struct CountingHasher {
    calls: AtomicUsize,
}

impl CountingHasher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PasswordHasher for CountingHasher {
    fn hash(&self, plaintext: &str) -> AuthResult<UserPassword> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(UserPassword::from_phc(format!("hashed:{plaintext}")))
    }

    fn verify(&self, plaintext: &str, hash: &UserPassword) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        hash.as_phc_string() == format!("hashed:{plaintext}")
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailSender for RecordingMailer {
    fn send(&self, message: MailMessage) {
        self.sent.lock().unwrap().push(message);
    }
}

#[derive(Default)]
pub struct RecordingScheduler {
    checks: Mutex<Vec<(UserId, DateTime<Utc>)>>,
}

impl RecordingScheduler {
    pub fn checks(&self) -> Vec<(UserId, DateTime<Utc>)> {
        self.checks.lock().unwrap().clone()
    }
}

impl RegistrationScheduler for RecordingScheduler {
    fn schedule_check(&self, user_id: UserId, at: DateTime<Utc>) {
        self.checks.lock().unwrap().push((user_id, at));
    }
}

// ============================================================================
// Fixture
// ============================================================================

pub const PASSWORD: &str = "Secret123";

/// Every collaborator a use case may need, wired to in-memory fakes
pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub hasher: Arc<CountingHasher>,
    pub mailer: Arc<RecordingMailer>,
    pub scheduler: Arc<RecordingScheduler>,
    pub policy: Arc<CredentialPolicy>,
    pub config: Arc<AuthConfig>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(AuthConfig::development())
    }

    pub fn with_config(config: AuthConfig) -> Self {
        Self {
            store: Arc::new(InMemoryStore::default()),
            hasher: Arc::new(CountingHasher::default()),
            mailer: Arc::new(RecordingMailer::default()),
            scheduler: Arc::new(RecordingScheduler::default()),
            policy: Arc::new(config.credential_policy()),
            config: Arc::new(config),
        }
    }

    /// Store a user directly, bypassing registration
    pub fn seed_user(&self, email: &str, user_name: &str, confirmed: bool) -> User {
        let mut user = User::new(
            Email::new(email).unwrap(),
            UserName::from_db(user_name),
            UserPassword::from_phc(format!("hashed:{PASSWORD}")),
        );
        user.email_confirmed = confirmed;
        self.store.insert_user(user.clone());
        user
    }
}
