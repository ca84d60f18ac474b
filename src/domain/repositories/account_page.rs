//! # Account Page Trait
//!
//! ログインとモデル選択の操作

use async_trait::async_trait;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use crate::domain::errors::PageError;

/// ログイン・モデル選択用の画面操作
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccountPage: Send + Sync {
    /// アプリの URL を開く
    async fn open_app(&self) -> Result<(), PageError>;

    /// 現在のページがアプリ画面か
    async fn on_app_page(&self) -> Result<bool, PageError>;

    /// 入力欄が `within` 以内に現れるか
    async fn prompt_present(&self, prompt_selector: &str, within: Duration)
        -> Result<bool, PageError>;

    /// 「ログイン」を押す
    async fn click_sign_in(&self) -> Result<(), PageError>;

    /// メールアドレスを入力して次へ進む
    async fn submit_email(&self, email: &str) -> Result<(), PageError>;

    /// パスワードを入力して次へ進む
    async fn submit_password(&self, password: &str) -> Result<(), PageError>;

    /// 現在選択中のモデル名
    async fn current_model_label(&self) -> Result<Option<String>, PageError>;

    /// モデル切り替えメニューを開く
    async fn open_model_switcher(&self) -> Result<(), PageError>;

    /// 目的のモデルを選ぶ
    async fn choose_target_model(&self) -> Result<(), PageError>;
}
