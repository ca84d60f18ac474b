//! # Domain Services
//!
//! エンティティに属さないビジネスルール
//!
//! - **file_filter**: スキャン対象ファイルの判定ルール

pub mod file_filter;
