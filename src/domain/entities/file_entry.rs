//! # FileEntry / ProjectScan
//!
//! アップロード対象ファイルとスキャン結果のドメインエンティティ

use std::path::{Path, PathBuf};

/// アップロード対象ファイル
///
/// 絶対パスと、フィルタ判定に使った拡張子（小文字）の組
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileEntry {
    path: PathBuf,
    extension: String,
}

impl FileEntry {
    /// 新しいファイルエントリを作成
    ///
    /// 拡張子はファイル名から算出する
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(extension_of)
            .unwrap_or_default();
        Self { path, extension }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

/// ファイル名から拡張子を取り出す（小文字化、先頭ドットを含む）
///
/// ドットファイルの先頭ドットは拡張子とみなさない。
///
/// ```
/// use gemini_uploader::domain::entities::file_entry::extension_of;
///
/// assert_eq!(extension_of("main.PY"), ".py");
/// assert_eq!(extension_of("archive.tar.gz"), ".gz");
/// assert_eq!(extension_of(".gitignore"), "");
/// assert_eq!(extension_of("Dockerfile"), "");
/// ```
pub fn extension_of(file_name: &str) -> String {
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[stem_start..].rfind('.') {
        Some(idx) => file_name[stem_start + idx..].to_lowercase(),
        None => String::new(),
    }
}

/// プロジェクトスキャン結果
///
/// 表示用のツリー行と、アップロード対象ファイルのソート済みリスト
#[derive(Debug, Clone, Default)]
pub struct ProjectScan {
    /// インデント付きツリーの各行
    pub tree_lines: Vec<String>,
    /// 絶対パスでソート・重複排除済みのファイル
    pub files: Vec<FileEntry>,
}

/// ツリーが空のときに出力する行
pub const EMPTY_TREE_PLACEHOLDER: &str =
    "(No files or folders matching criteria found after filtering.)";

impl ProjectScan {
    pub fn empty() -> Self {
        Self::default()
    }

    /// ツリーテキストを返す
    ///
    /// 行が1つもない場合はプレースホルダーを返す
    pub fn tree_text(&self) -> String {
        if self.tree_lines.is_empty() {
            EMPTY_TREE_PLACEHOLDER.to_string()
        } else {
            self.tree_lines.join("\n")
        }
    }

    /// ツリーに内容があるか（サイトマップを書き出す価値があるか）
    pub fn has_tree(&self) -> bool {
        !self.tree_lines.is_empty()
    }

    /// ファイルをソート順を保ったまま追加する（既に存在する場合は何もしない）
    pub fn ensure_file(&mut self, entry: FileEntry) -> bool {
        match self.files.binary_search(&entry) {
            Ok(_) => false,
            Err(pos) => {
                self.files.insert(pos, entry);
                true
            }
        }
    }
}
