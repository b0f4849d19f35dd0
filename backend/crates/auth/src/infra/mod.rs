//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod hasher;
pub mod mail;
pub mod postgres;
pub mod scheduler;

pub use hasher::Argon2PasswordHasher;
pub use mail::{RelayMailSender, TracingMailSender};
pub use postgres::PgAuthRepository;
pub use scheduler::TokioRegistrationScheduler;
