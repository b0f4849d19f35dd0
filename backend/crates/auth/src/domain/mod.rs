//! Domain Layer
//!
//! Contains entities, value objects, credential policy, repository traits
//! and the capability traits implemented by the infrastructure layer.

pub mod entity;
pub mod policy;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{one_time_code::OneTimeCode, user::User};
pub use repository::{CodeRepository, UserChanges, UserRepository};
pub use services::{MailMessage, MailSender, PasswordHasher, RegistrationScheduler};
