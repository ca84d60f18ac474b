//! # Project Repository Trait
//!
//! プロジェクトフォルダのスキャンとサイトマップ書き出しを抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::entities::file_entry::ProjectScan;
use crate::domain::services::file_filter::FilterConfig;

/// プロジェクトリポジトリ
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// プロジェクトをスキャンする
    ///
    /// # Arguments
    ///
    /// * `root` - 対象フォルダ
    /// * `filter` - フィルタ設定
    ///
    /// # Returns
    ///
    /// ツリー行とアップロード対象ファイル。有効なスキャンルートが1つも
    /// ない場合は空の結果（エラーにはしない）
    async fn scan(&self, root: &Path, filter: &FilterConfig) -> Result<ProjectScan>;

    /// サイトマップを書き出す（既存ファイルは上書き）
    ///
    /// # Returns
    ///
    /// 書き出したファイルのパス
    async fn write_sitemap(&self, root: &Path, file_name: &str, content: &str) -> Result<PathBuf>;
}
