//! # Domain Errors
//!
//! ページ操作のエラーと、自動化全体のエラー分類

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// ページ操作（ブラウザアダプター）のエラー
///
/// アダプター層が WebDriver のエラーを分類して返す
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    /// 要素が DOM 上で置き換えられた（再試行してよい）
    #[error("stale element: {0}")]
    Stale(String),

    /// ブラウザセッションが失われた（再試行しない）
    #[error("browser session lost: {0}")]
    SessionLost(String),

    /// 要素が見つからない、または時間内に操作可能にならなかった
    #[error("element not found: {0}")]
    NotFound(String),

    /// 要素はあるが操作に失敗した
    #[error("interaction failed: {0}")]
    Interaction(String),

    #[error("{0}")]
    Other(String),
}

impl PageError {
    pub fn is_session_lost(&self) -> bool {
        matches!(self, PageError::SessionLost(_))
    }
}

/// 自動化のエラー分類
#[derive(Debug, Error)]
pub enum AutomationError {
    /// 設定エラー（認証情報不足、対象フォルダ不正など）
    #[error("configuration error: {0}")]
    Config(String),

    /// 要素が見つからない・クリックできない
    #[error("interaction error: {0}")]
    Interaction(String),

    /// ページがエラー表示を出した
    #[error("assistant reported an error while waiting for '{action}': {messages:?}")]
    Interface {
        action: String,
        messages: Vec<String>,
        snapshot: Option<PathBuf>,
    },

    /// ブラウザとの接続が失われた
    #[error("browser session lost: {0}")]
    SessionLost(String),

    /// 時間内に準備完了にならなかった
    #[error("assistant did not become ready after {}s for '{action}'", .waited.as_secs())]
    Timeout {
        action: String,
        waited: Duration,
        snapshot: Option<PathBuf>,
    },
}

impl From<PageError> for AutomationError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::SessionLost(msg) => AutomationError::SessionLost(msg),
            other => AutomationError::Interaction(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_error_into_automation_error() {
        let lost: AutomationError = PageError::SessionLost("disconnected".to_string()).into();
        assert!(matches!(lost, AutomationError::SessionLost(_)));

        let missing: AutomationError = PageError::NotFound("send button".to_string()).into();
        match missing {
            AutomationError::Interaction(msg) => assert!(msg.contains("send button")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_timeout_message_names_action() {
        let err = AutomationError::Timeout {
            action: "batch 2 submission".to_string(),
            waited: Duration::from_secs(180),
            snapshot: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("180s"));
        assert!(msg.contains("batch 2 submission"));
    }
}
