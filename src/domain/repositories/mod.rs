//! # Domain Repositories
//!
//! Repository trait（インターフェース）定義
//!
//! ## 特徴
//!
//! - Domain層では実装を持たない（traitの定義のみ）
//! - Adapter層で具体的な実装を提供
//! - Web ページのマークアップ依存は `ChatPage` / `AccountPage` の実装に閉じ込める

pub mod account_page;
pub mod chat_page;
pub mod popup_dismisser;
pub mod project_repository;
