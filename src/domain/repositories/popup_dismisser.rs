//! # Popup Dismisser Trait
//!
//! DOM から触れないネイティブポップアップを画面座標のクリックで閉じる

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// 画面座標
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl std::fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// ネイティブポップアップを閉じる
///
/// 1回の呼び出しで1回クリックするだけ。再試行するかどうかは呼び出し側が決める
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PopupDismisser: Send + Sync {
    /// 指定座標をクリックする
    ///
    /// # Errors
    ///
    /// クリッカーが失敗・タイムアウトした場合
    async fn dismiss_at(&self, point: ScreenPoint) -> Result<()>;
}
