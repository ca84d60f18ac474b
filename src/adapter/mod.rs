//! Adapter Layer
//!
//! 外部システム（ブラウザ、ファイルシステム、クリッカー）との統合

pub mod browser;
pub mod clicker;
pub mod config;
pub mod repositories;
