//! Value Object Module

pub mod code_purpose;
pub mod email;
pub mod token;
pub mod user_id;
pub mod user_name;
pub mod user_password;
