//! File Project Repository Implementation
//!
//! ProjectRepositoryのファイルシステム実装

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::entities::file_entry::{FileEntry, ProjectScan};
use crate::domain::repositories::project_repository::ProjectRepository;
use crate::domain::services::file_filter::FilterConfig;

/// ツリー表示用のディレクトリ1つ分
struct DirNode {
    path: PathBuf,
    /// ツリーに載せるファイル名（名前順）
    files: Vec<String>,
    /// 除外されずに残ったサブディレクトリがあるか
    has_subdirs: bool,
}

/// ファイルシステムベースのプロジェクトリポジトリ
pub struct FileProjectRepository;

impl FileProjectRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    /// スキャンするルートを決める
    ///
    /// 存在しないものと、他のルートの走査で辿り着くものは除く
    ///
    /// シンボリックリンクのサブフォルダは親の走査では辿らないので残す
    fn resolve_scan_roots(root: &Path, subfolders: &[String]) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        for subfolder in subfolders {
            let candidate = if subfolder.is_empty() {
                root.to_path_buf()
            } else {
                root.join(subfolder)
            };
            if candidate.is_dir() && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        candidates
            .iter()
            .filter(|candidate| {
                Self::is_symlink(candidate)
                    || !candidates
                        .iter()
                        .any(|other| other != *candidate && candidate.starts_with(other))
            })
            .cloned()
            .collect()
    }

    fn is_symlink(path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// ルートからの深さ（ルート直下のディレクトリが 0）
    fn depth_from_root(root: &Path, dir: &Path) -> usize {
        dir.strip_prefix(root)
            .map(|rel| rel.components().count().saturating_sub(1))
            .unwrap_or(0)
    }

    fn scan_internal(root: &Path, filter: &FilterConfig) -> Result<ProjectScan> {
        let expanded = shellexpand::tilde(&root.to_string_lossy()).to_string();
        let root = std::path::absolute(&expanded)
            .with_context(|| format!("Failed to resolve target folder: {}", expanded))?;

        let scan_roots = Self::resolve_scan_roots(&root, &filter.subfolders);
        if scan_roots.is_empty() {
            warn!(
                "No valid folders to scan under {} (check TARGET_FOLDER_PATH)",
                root.display()
            );
            return Ok(ProjectScan::empty());
        }

        let mut nodes: Vec<DirNode> = Vec::new();
        let mut node_index: HashMap<PathBuf, usize> = HashMap::new();
        let mut files: BTreeSet<FileEntry> = BTreeSet::new();

        for scan_root in &scan_roots {
            // Files before directories so every directory lists its own files first
            let walker = WalkDir::new(scan_root)
                .sort_by(|a, b| {
                    a.file_type()
                        .is_dir()
                        .cmp(&b.file_type().is_dir())
                        .then_with(|| a.file_name().cmp(b.file_name()))
                })
                .into_iter()
                .filter_entry(|e| {
                    e.depth() == 0
                        || !e.file_type().is_dir()
                        || !filter.is_ignored_dir(&e.file_name().to_string_lossy())
                });

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping unreadable entry: {}", e);
                        continue;
                    }
                };
                let path = entry.path();

                if entry.file_type().is_dir() {
                    if let Some(parent) = path.parent().and_then(|p| node_index.get(p)) {
                        if entry.depth() > 0 {
                            nodes[*parent].has_subdirs = true;
                        }
                    }
                    node_index.insert(path.to_path_buf(), nodes.len());
                    nodes.push(DirNode {
                        path: path.to_path_buf(),
                        files: Vec::new(),
                        has_subdirs: false,
                    });
                    continue;
                }

                // Symlinked files count; symlinked directories are not descended
                if !path.is_file() {
                    continue;
                }

                let file_name = entry.file_name().to_string_lossy().to_string();
                if filter.is_selected(&file_name) {
                    files.insert(FileEntry::new(path));
                }
                if filter.is_listed_in_tree(&file_name) {
                    if let Some(parent) = path.parent().and_then(|p| node_index.get(p)) {
                        nodes[*parent].files.push(file_name);
                    }
                }
            }
        }

        let tree_lines = Self::render_tree(&root, &nodes);
        info!(
            "Scanned {} folders under {}: {} files selected",
            nodes.len(),
            root.display(),
            files.len()
        );

        Ok(ProjectScan {
            tree_lines,
            files: files.into_iter().collect(),
        })
    }

    /// ツリーの各行を組み立てる
    fn render_tree(root: &Path, nodes: &[DirNode]) -> Vec<String> {
        let mut lines = Vec::new();

        for node in nodes {
            let depth = Self::depth_from_root(root, &node.path);
            let name = node
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| node.path.display().to_string());

            if node.path == root {
                lines.push(format!("{}/", name));
            } else {
                lines.push(format!("{}├── {}/", "  ".repeat(depth), name));
            }

            let file_indent = "  ".repeat(depth + 1);
            for (i, file_name) in node.files.iter().enumerate() {
                let is_last = i + 1 == node.files.len();
                let prefix = if is_last && !node.has_subdirs {
                    "└── "
                } else {
                    "├── "
                };
                lines.push(format!("{}{}{}", file_indent, prefix, file_name));
            }
        }

        lines
    }

    fn write_sitemap_internal(root: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
        let expanded = shellexpand::tilde(&root.to_string_lossy()).to_string();
        let path = std::path::absolute(Path::new(&expanded).join(file_name))
            .with_context(|| format!("Failed to resolve sitemap path in {}", expanded))?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write sitemap: {}", path.display()))?;
        Ok(path)
    }
}

#[async_trait]
impl ProjectRepository for FileProjectRepository {
    async fn scan(&self, root: &Path, filter: &FilterConfig) -> Result<ProjectScan> {
        let root = root.to_path_buf();
        let filter = filter.clone();
        tokio::task::spawn_blocking(move || Self::scan_internal(&root, &filter))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))?
    }

    async fn write_sitemap(&self, root: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
        let root = root.to_path_buf();
        let file_name = file_name.to_string();
        let content = content.to_string();
        tokio::task::spawn_blocking(move || {
            Self::write_sitemap_internal(&root, &file_name, &content)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))?
    }
}

impl Default for FileProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}
