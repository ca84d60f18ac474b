//! Configuration Loading
//!
//! 環境変数（`.env` を含む）とスキャン設定ファイルから設定を組み立てる

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::dto::credentials::Credentials;
use crate::domain::entities::upload_batch::{resolve_batch_size, DEFAULT_BATCH_SIZE};
use crate::domain::errors::AutomationError;
use crate::domain::repositories::popup_dismisser::ScreenPoint;
use crate::domain::services::file_filter::FilterConfig;

pub const ENV_TARGET_FOLDER: &str = "TARGET_FOLDER_PATH";
pub const ENV_EMAIL: &str = "GEMINI_UPLOADER_EMAIL";
pub const ENV_PASSWORD: &str = "GEMINI_UPLOADER_PASSWORD";
pub const ENV_USE_PROFILE: &str = "USE_CHROME_PROFILE";
pub const ENV_USER_DATA_DIR: &str = "CHROME_USER_DATA_DIR_PATH";
pub const ENV_PROFILE_DIR: &str = "CHROME_PROFILE_DIR_NAME";
pub const ENV_BATCH_SIZE: &str = "UPLOAD_BATCH_SIZE";
pub const ENV_WEBDRIVER_URL: &str = "WEBDRIVER_URL";
pub const ENV_GEMINI_URL: &str = "GEMINI_URL";
pub const ENV_POPUP_X: &str = "NATIVE_POPUP_X";
pub const ENV_POPUP_Y: &str = "NATIVE_POPUP_Y";
pub const ENV_CLICKER_PATH: &str = "COORD_CLICKER_PATH";

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_GEMINI_URL: &str = "https://gemini.google.com/app";
pub const DEFAULT_PROFILE_DIR: &str = "Profile 1";
const USER_DATA_DIR_PLACEHOLDER: &str = "/path/to/your/chrome/User Data";
const CLICKER_BINARY: &str = "coord-clicker";

/// `--scan-config` で渡す JSON
///
/// 省略したキーはデフォルトのリストになる
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfigFile {
    pub subfolders: Option<Vec<String>>,
    pub ignored_dirs: Option<Vec<String>>,
    pub ignored_files: Option<Vec<String>>,
    pub allowed_extensions: Option<Vec<String>>,
}

impl ScanConfigFile {
    pub fn load(path: &Path) -> Result<Self, AutomationError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AutomationError::Config(format!(
                "cannot read scan config {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            AutomationError::Config(format!("invalid scan config {}: {}", path.display(), e))
        })
    }

    /// デフォルトのフィルタに上書きを適用する
    pub fn apply(self, mut filter: FilterConfig) -> FilterConfig {
        fn to_set(items: Vec<String>) -> BTreeSet<String> {
            items.into_iter().collect()
        }

        if let Some(subfolders) = self.subfolders {
            filter.subfolders = subfolders;
        }
        if let Some(dirs) = self.ignored_dirs {
            filter.ignored_dirs = to_set(dirs);
        }
        if let Some(files) = self.ignored_files {
            filter.ignored_files = to_set(files);
        }
        if let Some(extensions) = self.allowed_extensions {
            filter.allowed_extensions = to_set(extensions);
        }
        filter
    }
}

/// ブラウザ関連の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    pub use_profile: bool,
    pub user_data_dir: PathBuf,
    pub profile_dir_name: String,
    pub webdriver_url: String,
    pub app_url: String,
}

/// コマンドラインからの上書き
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub target: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub scan_config: Option<PathBuf>,
}

/// 実行時の設定
///
/// 起動時に一度だけ組み立て、以後は読み取り専用
#[derive(Debug, Clone)]
pub struct Config {
    pub target_folder: PathBuf,
    pub credentials: Credentials,
    pub browser: BrowserConfig,
    pub batch_size: usize,
    pub popup_point: Option<ScreenPoint>,
    pub clicker_path: PathBuf,
    pub filter: FilterConfig,
}

impl Config {
    /// プロセスの環境変数から設定を読み込む
    pub fn from_env(overrides: &ConfigOverrides) -> Result<Self, AutomationError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// # Errors
    ///
    /// 認証情報や対象フォルダが設定されていない場合、対象フォルダが存在しない場合、
    /// スキャン設定ファイルが読めない場合は `AutomationError::Config`
    pub fn from_lookup<F>(lookup: F, overrides: &ConfigOverrides) -> Result<Self, AutomationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let email = get(ENV_EMAIL);
        let password = get(ENV_PASSWORD);
        let (email, password) = match (email, password) {
            (Some(email), Some(password)) => (email, password),
            _ => {
                return Err(AutomationError::Config(format!(
                    "{} or {} not set in environment or .env file",
                    ENV_EMAIL, ENV_PASSWORD
                )))
            }
        };

        let target_folder = match &overrides.target {
            Some(target) => expand_path(&target.to_string_lossy()),
            None => get(ENV_TARGET_FOLDER)
                .map(|raw| expand_path(&raw))
                .ok_or_else(|| {
                    AutomationError::Config(format!("{} is not set", ENV_TARGET_FOLDER))
                })?,
        };
        if !target_folder.is_dir() {
            return Err(AutomationError::Config(format!(
                "target folder '{}' does not exist",
                target_folder.display()
            )));
        }

        let batch_size = match overrides.batch_size {
            Some(size) if size > 0 => size,
            _ => resolve_batch_size(get(ENV_BATCH_SIZE).as_deref(), DEFAULT_BATCH_SIZE),
        };

        let use_profile = get(ENV_USE_PROFILE).map(|v| parse_flag(&v)).unwrap_or(false);
        let browser = BrowserConfig {
            use_profile,
            user_data_dir: get(ENV_USER_DATA_DIR)
                .map(|raw| expand_path(&raw))
                .unwrap_or_else(|| PathBuf::from(USER_DATA_DIR_PLACEHOLDER)),
            profile_dir_name: get(ENV_PROFILE_DIR).unwrap_or_else(|| DEFAULT_PROFILE_DIR.to_string()),
            webdriver_url: get(ENV_WEBDRIVER_URL)
                .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string()),
            app_url: get(ENV_GEMINI_URL).unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string()),
        };

        let popup_point = match (get(ENV_POPUP_X), get(ENV_POPUP_Y)) {
            (Some(x), Some(y)) => Some(parse_point(&x, &y)?),
            (None, None) => None,
            _ => {
                return Err(AutomationError::Config(format!(
                    "{} and {} must be set together",
                    ENV_POPUP_X, ENV_POPUP_Y
                )))
            }
        };

        let clicker_path = get(ENV_CLICKER_PATH)
            .map(|raw| expand_path(&raw))
            .unwrap_or_else(default_clicker_path);

        let filter = match &overrides.scan_config {
            Some(path) => ScanConfigFile::load(path)?.apply(FilterConfig::default()),
            None => FilterConfig::default(),
        };

        Ok(Self {
            target_folder,
            credentials: Credentials::new(email, password),
            browser,
            batch_size,
            popup_point,
            clicker_path,
            filter,
        })
    }
}

/// `~` を展開したパス
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// `true` / `1` / `yes`（大文字小文字を区別しない）を真とみなす
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse_point(x: &str, y: &str) -> Result<ScreenPoint, AutomationError> {
    let parse = |name: &str, raw: &str| {
        raw.parse::<i32>().map_err(|_| {
            AutomationError::Config(format!("{} must be an integer, got '{}'", name, raw))
        })
    };
    Ok(ScreenPoint {
        x: parse(ENV_POPUP_X, x)?,
        y: parse(ENV_POPUP_Y, y)?,
    })
}

/// 実行中のバイナリと同じディレクトリにあるクリッカー
fn default_clicker_path() -> PathBuf {
    let file_name = format!("{}{}", CLICKER_BINARY, std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file_name)))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn create_test_env(target: &Path) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert(ENV_EMAIL.to_string(), "user@example.com".to_string());
        env.insert(ENV_PASSWORD.to_string(), "secret".to_string());
        env.insert(
            ENV_TARGET_FOLDER.to_string(),
            target.to_string_lossy().to_string(),
        );
        env
    }

    fn load(env: &HashMap<String, String>, overrides: &ConfigOverrides) -> Result<Config, AutomationError> {
        Config::from_lookup(|key| env.get(key).cloned(), overrides)
    }

    #[test]
    fn test_load_defaults() {
        let dir = TempDir::new().unwrap();
        let env = create_test_env(dir.path());

        let config = load(&env, &ConfigOverrides::default()).unwrap();

        assert_eq!(config.target_folder, dir.path());
        assert_eq!(config.credentials.email(), "user@example.com");
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(!config.browser.use_profile);
        assert_eq!(config.browser.profile_dir_name, "Profile 1");
        assert_eq!(config.browser.webdriver_url, DEFAULT_WEBDRIVER_URL);
        assert_eq!(config.browser.app_url, DEFAULT_GEMINI_URL);
        assert_eq!(config.popup_point, None);
        assert_eq!(config.filter, FilterConfig::default());
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let dir = TempDir::new().unwrap();
        let mut env = create_test_env(dir.path());
        env.remove(ENV_PASSWORD);

        let result = load(&env, &ConfigOverrides::default());

        assert!(matches!(result, Err(AutomationError::Config(_))));
    }

    #[test]
    fn test_blank_credentials_is_config_error() {
        let dir = TempDir::new().unwrap();
        let mut env = create_test_env(dir.path());
        env.insert(ENV_EMAIL.to_string(), "   ".to_string());

        assert!(load(&env, &ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_missing_target_folder_is_config_error() {
        let dir = TempDir::new().unwrap();
        let env = create_test_env(&dir.path().join("missing"));

        let result = load(&env, &ConfigOverrides::default());

        match result {
            Err(AutomationError::Config(msg)) => assert!(msg.contains("does not exist")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_size_fallbacks() {
        let dir = TempDir::new().unwrap();
        let mut env = create_test_env(dir.path());

        env.insert(ENV_BATCH_SIZE.to_string(), "25".to_string());
        assert_eq!(load(&env, &ConfigOverrides::default()).unwrap().batch_size, 25);

        env.insert(ENV_BATCH_SIZE.to_string(), "abc".to_string());
        assert_eq!(load(&env, &ConfigOverrides::default()).unwrap().batch_size, 10);

        env.insert(ENV_BATCH_SIZE.to_string(), "-3".to_string());
        assert_eq!(load(&env, &ConfigOverrides::default()).unwrap().batch_size, 10);
    }

    #[test]
    fn test_cli_overrides_win() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let mut env = create_test_env(dir.path());
        env.insert(ENV_BATCH_SIZE.to_string(), "25".to_string());

        let overrides = ConfigOverrides {
            target: Some(other.path().to_path_buf()),
            batch_size: Some(3),
            scan_config: None,
        };
        let config = load(&env, &overrides).unwrap();

        assert_eq!(config.target_folder, other.path());
        assert_eq!(config.batch_size, 3);
    }

    #[test]
    fn test_profile_flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag("YES"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn test_popup_point() {
        let dir = TempDir::new().unwrap();
        let mut env = create_test_env(dir.path());
        env.insert(ENV_POPUP_X.to_string(), "870".to_string());
        env.insert(ENV_POPUP_Y.to_string(), "680".to_string());

        let config = load(&env, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.popup_point, Some(ScreenPoint { x: 870, y: 680 }));

        env.remove(ENV_POPUP_Y);
        assert!(load(&env, &ConfigOverrides::default()).is_err());

        env.insert(ENV_POPUP_Y.to_string(), "abc".to_string());
        assert!(load(&env, &ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_scan_config_overrides_lists() {
        let dir = TempDir::new().unwrap();
        let scan_config = dir.path().join("scan.json");
        fs::write(
            &scan_config,
            r#"{"subfolders": ["src"], "allowed_extensions": [".rs"]}"#,
        )
        .unwrap();
        let env = create_test_env(dir.path());

        let overrides = ConfigOverrides {
            scan_config: Some(scan_config),
            ..Default::default()
        };
        let config = load(&env, &overrides).unwrap();

        assert_eq!(config.filter.subfolders, vec!["src".to_string()]);
        assert!(config.filter.is_allowed_extension("main.rs"));
        assert!(!config.filter.is_allowed_extension("main.py"));
        assert!(config.filter.is_ignored_dir("node_modules"));
    }

    #[test]
    fn test_invalid_scan_config_is_config_error() {
        let dir = TempDir::new().unwrap();
        let scan_config = dir.path().join("scan.json");
        fs::write(&scan_config, "not json").unwrap();
        let env = create_test_env(dir.path());

        let overrides = ConfigOverrides {
            scan_config: Some(scan_config),
            ..Default::default()
        };

        assert!(matches!(
            load(&env, &overrides),
            Err(AutomationError::Config(_))
        ));
    }

    #[test]
    fn test_expand_path_without_tilde_is_unchanged() {
        assert_eq!(expand_path("/abs/project"), PathBuf::from("/abs/project"));
    }
}
