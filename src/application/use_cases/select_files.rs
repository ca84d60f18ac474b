//! # Select Files Use Case
//!
//! ファイル選択とサイトマップ生成ユースケース

use anyhow::Result;
use log::warn;
use std::path::Path;
use std::sync::Arc;

use crate::domain::entities::file_entry::{FileEntry, ProjectScan};
use crate::domain::repositories::project_repository::ProjectRepository;
use crate::domain::services::file_filter::FilterConfig;

/// ファイル選択ユースケース
///
/// プロジェクトをスキャンしてツリーをサイトマップとして書き出し、
/// サイトマップを含むアップロード対象ファイルを返す
pub struct SelectFilesUseCase<R: ProjectRepository> {
    project_repository: Arc<R>,
}

impl<R: ProjectRepository> SelectFilesUseCase<R> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `project_repository` - プロジェクトリポジトリ
    pub fn new(project_repository: Arc<R>) -> Self {
        Self { project_repository }
    }

    /// ファイルを選択する
    ///
    /// # Arguments
    ///
    /// * `root` - 対象フォルダ
    /// * `filter` - フィルタ設定
    ///
    /// # Returns
    ///
    /// ツリーとアップロード対象ファイル。サイトマップを書き出せた場合は
    /// そのパスが必ずファイルリストに含まれる
    ///
    /// # Errors
    ///
    /// スキャン自体が失敗した場合。サイトマップの書き出し失敗は警告のみ
    pub async fn execute(&self, root: &Path, filter: &FilterConfig) -> Result<ProjectScan> {
        println!("Generating file tree...");
        let mut scan = self.project_repository.scan(root, filter).await?;

        if !scan.has_tree() {
            warn!("File tree generation: {}", scan.tree_text());
        } else {
            match self
                .project_repository
                .write_sitemap(root, &filter.sitemap_name, &scan.tree_text())
                .await
            {
                Ok(path) => {
                    println!("✓ File tree saved to: {}", path.display());
                    scan.ensure_file(FileEntry::new(path));
                }
                Err(e) => warn!("Could not write sitemap: {:#}", e),
            }
        }

        if scan.files.is_empty() {
            println!("No files matching criteria found for upload.");
        } else {
            println!("✓ Found {} unique files to process for upload.", scan.files.len());
        }

        Ok(scan)
    }
}
