//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (CSPRNG strings, constant-time comparison)
//! - Password hashing (Argon2id, zeroized clear text)
//! - Outbound mail relay client

pub mod crypto;
pub mod mail;
pub mod password;
