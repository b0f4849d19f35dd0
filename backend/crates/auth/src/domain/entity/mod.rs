//! Entity Module

pub mod one_time_code;
pub mod user;
