//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::{
    ChangePasswordInput, ConfirmRegistrationInput, ConfirmResetPasswordInput, LoginInput,
    RefreshTokensInput, RegisterInput, RepeatRegistrationCodeInput, ResetPasswordInput,
};
use crate::domain::entity::user::User;

// ============================================================================
// Registration
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub user_name: String,
    pub password: String,
    pub re_password: String,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            user_name: req.user_name,
            password: req.password,
            re_password: req.re_password,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRegistrationRequest {
    pub email: String,
    pub code: String,
}

impl From<ConfirmRegistrationRequest> for ConfirmRegistrationInput {
    fn from(req: ConfirmRegistrationRequest) -> Self {
        Self {
            email: req.email,
            code: req.code,
        }
    }
}

/// Body of every request that only names an email
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub email: String,
}

impl From<EmailRequest> for RepeatRegistrationCodeInput {
    fn from(req: EmailRequest) -> Self {
        Self { email: req.email }
    }
}

impl From<EmailRequest> for ResetPasswordInput {
    fn from(req: EmailRequest) -> Self {
        Self { email: req.email }
    }
}

// ============================================================================
// Login & Tokens
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// User name or email
    pub login: String,
    pub password: String,
}

impl From<LoginRequest> for LoginInput {
    fn from(req: LoginRequest) -> Self {
        Self {
            login: req.login,
            password: req.password,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokensRequest {
    pub refresh: String,
}

impl From<RefreshTokensRequest> for RefreshTokensInput {
    fn from(req: RefreshTokensRequest) -> Self {
        Self {
            refresh: req.refresh,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenRequest {
    pub access: String,
}

/// Owner of a verified access token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub user_id: String,
    pub email: String,
    pub user_name: String,
}

impl From<&User> for UserInfoResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            user_name: user.user_name.original().to_string(),
        }
    }
}

// ============================================================================
// Passwords
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub re_new_password: String,
}

impl From<ChangePasswordRequest> for ChangePasswordInput {
    fn from(req: ChangePasswordRequest) -> Self {
        Self {
            current_password: req.current_password,
            new_password: req.new_password,
            re_new_password: req.re_new_password,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
    pub re_new_password: String,
}

impl From<ConfirmResetPasswordRequest> for ConfirmResetPasswordInput {
    fn from(req: ConfirmResetPasswordRequest) -> Self {
        Self {
            email: req.email,
            code: req.code,
            new_password: req.new_password,
            re_new_password: req.re_new_password,
        }
    }
}
