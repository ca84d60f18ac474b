//! # File Filter Service
//!
//! スキャン対象の判定ルール（無視ディレクトリ・無視ファイル・許可拡張子）

use std::collections::BTreeSet;

use crate::domain::entities::file_entry::extension_of;

/// 生成するサイトマップのファイル名
pub const SITEMAP_FILENAME: &str = "project_structure_sitemap.xml";

const DEFAULT_SUBFOLDERS: &[&str] = &[
    "", "src", "lib", "components", "pages", "utils", "styles", "scripts", "tests", "app",
    "server", "api",
];

const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git", "node_modules", "__pycache__", ".venv", "venv",
    "dist", "build", "out", "target",
    ".vscode", ".idea", ".project", ".settings",
    "docs", "coverage", "logs",
    "temp", "tmp", "backup",
    "assets", "static", "media", "images", "fonts",
];

const DEFAULT_IGNORED_FILES: &[&str] = &[
    ".gitignore", ".env", ".DS_Store", "Thumbs.db",
    "package-lock.json", "yarn.lock", "pnpm-lock.yaml", "poetry.lock", "Pipfile.lock",
    "*.log", "*.tmp", "*.bak", "*.swp", "*.swo",
    "LICENSE", "CONTRIBUTING.md", "CODE_OF_CONDUCT.md",
    SITEMAP_FILENAME,
];

const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".py", ".js", ".ts", ".jsx", ".tsx", ".html", ".css", ".scss", ".less",
    ".json", ".xml", ".csv", ".java", ".kt", ".swift", ".c", ".cpp", ".h", ".hpp",
    ".cs", ".go", ".rb", ".php", ".pl", ".sh", ".bat", ".ps1",
    ".yaml", ".yml", ".ini", ".cfg", ".toml", ".sql",
    ".env.example", ".dockerfile", "Dockerfile",
];

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// フィルタ設定
///
/// 起動時に一度だけ作られ、以後は読み取り専用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// スキャンするサブフォルダ（`""` はルート自身）
    pub subfolders: Vec<String>,
    /// 丸ごと除外するディレクトリ名
    pub ignored_dirs: BTreeSet<String>,
    /// 除外するファイル名（`*.ext` はサフィックス一致）
    pub ignored_files: BTreeSet<String>,
    /// 許可する拡張子（ファイル名そのもの、複数ドットの末尾も可）
    pub allowed_extensions: BTreeSet<String>,
    /// 強制的に含めるサイトマップのファイル名
    pub sitemap_name: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            subfolders: DEFAULT_SUBFOLDERS.iter().map(|s| s.to_string()).collect(),
            ignored_dirs: to_set(DEFAULT_IGNORED_DIRS),
            ignored_files: to_set(DEFAULT_IGNORED_FILES),
            allowed_extensions: to_set(DEFAULT_ALLOWED_EXTENSIONS),
            sitemap_name: SITEMAP_FILENAME.to_string(),
        }
    }
}

impl FilterConfig {
    /// ディレクトリ名が除外対象か
    pub fn is_ignored_dir(&self, dir_name: &str) -> bool {
        self.ignored_dirs.contains(dir_name)
    }

    /// ファイル名が除外リストに一致するか
    pub fn is_ignored_file(&self, file_name: &str) -> bool {
        self.ignored_files.iter().any(|pattern| match pattern.strip_prefix('*') {
            Some(suffix) if !suffix.is_empty() => file_name.ends_with(suffix),
            _ => pattern == file_name,
        })
    }

    /// 拡張子（またはファイル名）が許可されているか
    pub fn is_allowed_extension(&self, file_name: &str) -> bool {
        let ext = extension_of(file_name);
        if !ext.is_empty() && self.allowed_extensions.contains(&ext) {
            return true;
        }
        if self.allowed_extensions.contains(file_name) {
            return true;
        }

        let lower = file_name.to_lowercase();
        self.allowed_extensions
            .iter()
            .filter(|allowed| allowed.starts_with('.') && allowed.matches('.').count() > 1)
            .any(|allowed| lower.ends_with(allowed.as_str()))
    }

    /// サイトマップ自身か
    pub fn is_sitemap(&self, file_name: &str) -> bool {
        file_name == self.sitemap_name
    }

    /// ツリー表示に載せるファイルか
    ///
    /// サイトマップ自身はツリーに載せない
    pub fn is_listed_in_tree(&self, file_name: &str) -> bool {
        !self.is_sitemap(file_name)
            && !self.is_ignored_file(file_name)
            && self.is_allowed_extension(file_name)
    }

    /// アップロード対象のファイルか
    ///
    /// サイトマップは除外リストや拡張子に関係なく常に対象
    pub fn is_selected(&self, file_name: &str) -> bool {
        if self.is_sitemap(file_name) {
            return true;
        }
        !self.is_ignored_file(file_name) && self.is_allowed_extension(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists() {
        let config = FilterConfig::default();
        assert!(config.subfolders.contains(&String::new()));
        assert!(config.is_ignored_dir("node_modules"));
        assert!(config.is_ignored_dir(".git"));
        assert!(!config.is_ignored_dir("src"));
        assert_eq!(config.sitemap_name, SITEMAP_FILENAME);
    }

    #[test]
    fn test_ignored_file_exact_and_wildcard() {
        let config = FilterConfig::default();
        assert!(config.is_ignored_file(".env"));
        assert!(config.is_ignored_file("package-lock.json"));
        assert!(config.is_ignored_file("debug.log"));
        assert!(config.is_ignored_file("notes.swp"));
        assert!(!config.is_ignored_file("package.json"));
        assert!(!config.is_ignored_file("catalog.py"));
    }

    #[test]
    fn test_allowed_extension() {
        let config = FilterConfig::default();
        assert!(config.is_allowed_extension("a.py"));
        assert!(config.is_allowed_extension("App.TSX"));
        assert!(config.is_allowed_extension("Dockerfile"));
        assert!(config.is_allowed_extension(".env.example"));
        assert!(!config.is_allowed_extension("b.png"));
        assert!(!config.is_allowed_extension("Makefile"));
        assert!(!config.is_allowed_extension("archive.example"));
    }

    #[test]
    fn test_sitemap_selected_but_not_listed() {
        let config = FilterConfig::default();
        assert!(config.is_selected(SITEMAP_FILENAME));
        assert!(!config.is_listed_in_tree(SITEMAP_FILENAME));
    }

    #[test]
    fn test_sitemap_selected_even_with_disallowed_extension() {
        let config = FilterConfig {
            sitemap_name: "tree.map".to_string(),
            ..FilterConfig::default()
        };
        assert!(!config.is_allowed_extension("tree.map"));
        assert!(config.is_selected("tree.map"));
    }

    #[test]
    fn test_ignored_file_not_selected() {
        let config = FilterConfig::default();
        assert!(!config.is_selected("LICENSE"));
        assert!(!config.is_selected("CONTRIBUTING.md"));
        assert!(config.is_selected("README.md"));
    }
}
