//! # Chat Page Trait
//!
//! チャット画面に対する意味レベルの操作（状態の観測・ファイル添付・送信）

use async_trait::async_trait;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

use crate::domain::errors::PageError;

/// チャット画面
///
/// 実装はブラウザのマークアップに依存するが、呼び出し側は
/// この trait の操作だけを使う
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatPage: Send + Sync {
    /// 表示中のエラーメッセージ（なければ空）
    async fn error_messages(&self) -> Result<Vec<String>, PageError>;

    /// 「Just a sec...」などの作業中インジケータが出ているか
    async fn working_indicator_visible(&self) -> Result<bool, PageError>;

    /// 生成停止ボタンが出ているか
    async fn stop_control_visible(&self) -> Result<bool, PageError>;

    /// ローディングスピナーが出ているか
    async fn loading_spinner_visible(&self) -> Result<bool, PageError>;

    /// 入力欄が操作可能で、空またはプレースホルダー表示か
    async fn prompt_accepts_input(&self, prompt_selector: &str) -> Result<bool, PageError>;

    /// 診断用スクリーンショットを保存する（失敗しても呼び出し側は続行する）
    async fn capture_snapshot(&self, label: &str) -> Option<PathBuf>;

    /// 表示中の添付チップ数
    async fn attachment_chip_count(&self) -> Result<usize, PageError>;

    /// 添付メニューを開く
    async fn open_attach_menu(&self) -> Result<(), PageError>;

    /// メニューの「ファイルをアップロード」を選ぶ
    async fn choose_upload_entry(&self) -> Result<(), PageError>;

    /// ファイル入力要素にパスを渡す
    async fn populate_file_input(&self, paths: &[PathBuf]) -> Result<(), PageError>;

    /// 入力欄にメッセージを入力する
    async fn type_message(&self, prompt_selector: &str, message: &str) -> Result<(), PageError>;

    /// 送信ボタンを押す
    async fn click_send(&self) -> Result<(), PageError>;
}
