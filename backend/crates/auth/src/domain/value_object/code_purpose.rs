//! One-Time Code Purpose

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// What a one-time code authorizes
///
/// Each purpose has its own active window and history; codes of different
/// purposes never interfere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodePurpose {
    #[display("EMAIL_CONFIRM")]
    EmailConfirm,
    #[display("RESET_PASSWORD")]
    ResetPassword,
}

impl CodePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodePurpose::EmailConfirm => "EMAIL_CONFIRM",
            CodePurpose::ResetPassword => "RESET_PASSWORD",
        }
    }

    /// Parse the stored representation
    pub fn from_db(value: &str) -> AuthResult<Self> {
        match value {
            "EMAIL_CONFIRM" => Ok(CodePurpose::EmailConfirm),
            "RESET_PASSWORD" => Ok(CodePurpose::ResetPassword),
            other => Err(AuthError::Internal(format!("Unknown code purpose: {other}"))),
        }
    }

    /// Subject line of the delivery mail
    pub fn mail_subject(&self) -> &'static str {
        match self {
            CodePurpose::EmailConfirm => "Email confirmation",
            CodePurpose::ResetPassword => "Reset password",
        }
    }

    /// Body of the delivery mail
    pub fn mail_body(&self, code: &str) -> String {
        match self {
            CodePurpose::EmailConfirm => format!("Your confirmation code: {code}"),
            CodePurpose::ResetPassword => format!("Your code for password reset: {code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_roundtrip() {
        for purpose in [CodePurpose::EmailConfirm, CodePurpose::ResetPassword] {
            assert_eq!(CodePurpose::from_db(purpose.as_str()).unwrap(), purpose);
            assert_eq!(purpose.to_string(), purpose.as_str());
        }
        assert!(CodePurpose::from_db("LOGIN").is_err());
    }

    #[test]
    fn test_mail_body_contains_code() {
        assert!(CodePurpose::ResetPassword.mail_body("123456").ends_with("123456"));
    }
}
