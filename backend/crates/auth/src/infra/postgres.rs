//! PostgreSQL Repository Implementations

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{one_time_code::OneTimeCode, user::User};
use crate::domain::repository::{CodeRepository, UserChanges, UserRepository};
use crate::domain::value_object::{
    code_purpose::CodePurpose, email::Email, user_id::UserId, user_name::UserName,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};
use kernel::id::CodeId;

const USERS_EMAIL_KEY: &str = "users_email_key";
const USERS_USER_NAME_KEY: &str = "users_user_name_key";

const USER_COLUMNS: &str = r#"
    user_id,
    email,
    user_name,
    password_hash,
    is_active,
    email_confirmed,
    tokens_revoked_at,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed user and code repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_user(&self, filter: &str, bind: &str) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {filter}");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }
}

const CODE_COLUMNS: &str = "code_id, user_id, code, purpose, created_at, consumed_at";

/// Unique-index violations become the matching Conflict
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &err {
        match db.constraint() {
            Some(USERS_EMAIL_KEY) => return AuthError::EmailTaken,
            Some(USERS_USER_NAME_KEY) => return AuthError::UserNameTaken,
            _ => {}
        }
    }
    AuthError::Database(err)
}

/// COALESCE update shared by plain updates and code redemption
async fn apply_user_changes<'e, E>(
    executor: E,
    user_id: &UserId,
    changes: UserChanges,
) -> AuthResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let updated = sqlx::query(
        r#"
        UPDATE users SET
            password_hash = COALESCE($2, password_hash),
            email_confirmed = COALESCE($3, email_confirmed),
            tokens_revoked_at = COALESCE($4, tokens_revoked_at),
            is_active = COALESCE($5, is_active),
            updated_at = now()
        WHERE user_id = $1
        "#,
    )
    .bind(user_id.as_uuid())
    .bind(changes.password_hash.map(UserPassword::into_db))
    .bind(changes.email_confirmed)
    .bind(changes.tokens_revoked_at)
    .bind(changes.is_active)
    .execute(executor)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(AuthError::UserNotFound);
    }

    Ok(())
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create_with_code(&self, user: &User, code: &OneTimeCode) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                user_name,
                password_hash,
                is_active,
                email_confirmed,
                tokens_revoked_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.user_name.original())
        .bind(user.password_hash.as_phc_string())
        .bind(user.is_active)
        .bind(user.email_confirmed)
        .bind(user.tokens_revoked_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query(
            r#"
            INSERT INTO one_time_codes (code_id, user_id, code, purpose, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(code.code_id.as_uuid())
        .bind(code.user_id.as_uuid())
        .bind(&code.code)
        .bind(code.purpose.as_str())
        .bind(code.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn update(&self, user_id: &UserId, changes: UserChanges) -> AuthResult<()> {
        apply_user_changes(&self.pool, user_id, changes).await
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE lower(user_name) = $1)",
        )
        .bind(user_name.canonical())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_login(&self, login: &str) -> AuthResult<Option<User>> {
        self.fetch_user(
            "email_confirmed AND (lower(user_name) = lower($1) OR lower(email) = lower($1))",
            login,
        )
        .await
    }

    async fn find_by_email(
        &self,
        email: &Email,
        include_unconfirmed: bool,
    ) -> AuthResult<Option<User>> {
        let filter = if include_unconfirmed {
            "lower(email) = lower($1)"
        } else {
            "lower(email) = lower($1) AND email_confirmed"
        };
        self.fetch_user(filter, email.as_str()).await
    }

    async fn delete_unconfirmed_before(&self, cutoff: DateTime<Utc>) -> AuthResult<u64> {
        let deleted =
            sqlx::query("DELETE FROM users WHERE NOT email_confirmed AND created_at < $1")
                .bind(cutoff)
                .execute(&self.pool)
                .await?
                .rows_affected();

        tracing::info!(users_deleted = deleted, "Swept unconfirmed registrations");

        Ok(deleted)
    }
}

// ============================================================================
// Code Repository Implementation
// ============================================================================

impl CodeRepository for PgAuthRepository {
    async fn create_code(
        &self,
        code: &OneTimeCode,
        active_window: Duration,
    ) -> AuthResult<Option<OneTimeCode>> {
        let window = chrono::Duration::from_std(active_window)
            .map_err(|e| AuthError::Internal(format!("Invalid code window: {}", e)))?;
        let cutoff = code.created_at - window;

        let mut tx = self.pool.begin().await?;

        // Serialise issuers of the same (user, purpose) until commit
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(format!("{}:{}", code.user_id, code.purpose.as_str()))
            .execute(&mut *tx)
            .await?;

        let sql = format!(
            r#"
            INSERT INTO one_time_codes (code_id, user_id, code, purpose, created_at)
            SELECT $1, $2, $3, $4, $5
            WHERE NOT EXISTS (
                SELECT 1 FROM one_time_codes
                WHERE user_id = $2 AND purpose = $4 AND consumed_at IS NULL AND created_at > $6
            )
            RETURNING {CODE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, CodeRow>(&sql)
        .bind(code.code_id.as_uuid())
        .bind(code.user_id.as_uuid())
        .bind(&code.code)
        .bind(code.purpose.as_str())
        .bind(code.created_at)
        .bind(cutoff)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        row.map(CodeRow::into_code).transpose()
    }

    async fn find_most_recent_code(
        &self,
        user_id: &UserId,
        purpose: CodePurpose,
    ) -> AuthResult<Option<OneTimeCode>> {
        let sql = format!(
            r#"
            SELECT {CODE_COLUMNS}
            FROM one_time_codes
            WHERE user_id = $1 AND purpose = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#
        );
        let row = sqlx::query_as::<_, CodeRow>(&sql)
            .bind(user_id.as_uuid())
            .bind(purpose.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(CodeRow::into_code).transpose()
    }

    async fn redeem_code(&self, code: &OneTimeCode, changes: UserChanges) -> AuthResult<bool> {
        let mut tx = self.pool.begin().await?;

        let consumed = sqlx::query(
            r#"
            UPDATE one_time_codes SET consumed_at = now()
            WHERE code_id = $1 AND consumed_at IS NULL
            "#,
        )
        .bind(code.code_id.as_uuid())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if consumed == 0 {
            // Rolled back on drop
            return Ok(false);
        }

        apply_user_changes(&mut *tx, &code.user_id, changes).await?;

        tx.commit().await?;

        tracing::debug!(user_id = %code.user_id, purpose = %code.purpose, "One-time code redeemed");

        Ok(true)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    user_name: String,
    password_hash: String,
    is_active: bool,
    email_confirmed: bool,
    tokens_revoked_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            user_name: UserName::from_db(&self.user_name),
            password_hash: UserPassword::from_db(self.password_hash),
            is_active: self.is_active,
            email_confirmed: self.email_confirmed,
            tokens_revoked_at: self.tokens_revoked_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CodeRow {
    code_id: Uuid,
    user_id: Uuid,
    code: String,
    purpose: String,
    created_at: DateTime<Utc>,
    consumed_at: Option<DateTime<Utc>>,
}

impl CodeRow {
    fn into_code(self) -> AuthResult<OneTimeCode> {
        Ok(OneTimeCode {
            code_id: CodeId::from_uuid(self.code_id),
            user_id: UserId::from_uuid(self.user_id),
            code: self.code,
            purpose: CodePurpose::from_db(&self.purpose)?,
            created_at: self.created_at,
            consumed_at: self.consumed_at,
        })
    }
}
