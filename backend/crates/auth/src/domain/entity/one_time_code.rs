//! One-Time Code Entity

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::domain::value_object::{code_purpose::CodePurpose, user_id::UserId};
use kernel::id::CodeId;

/// Short-lived numeric code bound to a user and a purpose
///
/// Older codes stay in storage; only the most recent code per
/// (user, purpose) is ever consulted. A redeemed code carries `consumed_at`
/// and is never active again.
#[derive(Clone)]
pub struct OneTimeCode {
    pub code_id: CodeId,
    pub user_id: UserId,
    pub code: String,
    pub purpose: CodePurpose,
    pub created_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
}

impl OneTimeCode {
    pub fn new(user_id: UserId, code: String, purpose: CodePurpose) -> Self {
        Self {
            code_id: CodeId::new(),
            user_id,
            code,
            purpose,
            created_at: Utc::now(),
            consumed_at: None,
        }
    }

    /// Whole seconds since creation, never negative
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_seconds().max(0)
    }

    /// Active while unredeemed and strictly fewer than `window` seconds have elapsed
    pub fn is_active(&self, window: Duration, now: DateTime<Utc>) -> bool {
        self.consumed_at.is_none() && self.elapsed_secs(now) < window_secs(window)
    }

    /// Seconds until the code stops being active (0 once inactive)
    pub fn remaining_secs(&self, window: Duration, now: DateTime<Utc>) -> i64 {
        if !self.is_active(window, now) {
            return 0;
        }
        window_secs(window) - self.elapsed_secs(now)
    }
}

fn window_secs(window: Duration) -> i64 {
    i64::try_from(window.as_secs()).unwrap_or(i64::MAX)
}

impl std::fmt::Debug for OneTimeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneTimeCode")
            .field("code_id", &self.code_id)
            .field("user_id", &self.user_id)
            .field("code", &"[REDACTED]")
            .field("purpose", &self.purpose)
            .field("created_at", &self.created_at)
            .field("consumed_at", &self.consumed_at)
            .finish()
    }
}
