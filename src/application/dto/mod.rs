//! # Data Transfer Objects
//!
//! ユースケースに渡す設定値

pub mod credentials;
pub mod upload_config;
