//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod change_password;
pub mod check_registration;
pub mod codes;
pub mod config;
pub mod confirm_registration;
pub mod confirm_reset_password;
pub mod login;
pub mod refresh_tokens;
pub mod register;
pub mod repeat_registration_code;
pub mod reset_password;
pub mod revoke_tokens;
pub mod tokens;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use check_registration::CheckRegistrationUseCase;
pub use codes::{CodeDelivery, CodeIssuer, CodeSent, CodeVerifier, IssuedCode};
pub use config::AuthConfig;
pub use confirm_registration::{ConfirmRegistrationInput, ConfirmRegistrationUseCase};
pub use confirm_reset_password::{ConfirmResetPasswordInput, ConfirmResetPasswordUseCase};
pub use login::{LoginInput, LoginUseCase};
pub use refresh_tokens::{RefreshTokensInput, RefreshTokensUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use repeat_registration_code::{RepeatRegistrationCodeInput, RepeatRegistrationCodeUseCase};
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
pub use revoke_tokens::RevokeTokensUseCase;
pub use tokens::TokenService;
