//! Registration Check Scheduler

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::check_registration::CheckRegistrationUseCase;
use crate::domain::repository::UserRepository;
use crate::domain::services::RegistrationScheduler;
use crate::domain::value_object::user_id::UserId;

/// Sleeps on the tokio runtime until the deadline, then runs the check
///
/// Pending checks do not survive a restart; the API sweeps stale
/// unconfirmed users at startup instead.
pub struct TokioRegistrationScheduler<U> {
    user_repo: Arc<U>,
}

impl<U> TokioRegistrationScheduler<U>
where
    U: UserRepository + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }
}

impl<U> RegistrationScheduler for TokioRegistrationScheduler<U>
where
    U: UserRepository + Sync + 'static,
{
    fn schedule_check(&self, user_id: UserId, at: DateTime<Utc>) {
        let delay = (at - Utc::now()).to_std().unwrap_or_default();
        let use_case = CheckRegistrationUseCase::new(self.user_repo.clone());

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = use_case.execute(&user_id).await {
                tracing::error!(user_id = %user_id, error = %e, "Registration check failed");
            }
        });
    }
}
