//! # Upload Configuration DTO
//!
//! アップロード処理・準備待ち・ログイン処理の設定

use std::time::Duration;

use crate::domain::services::file_filter::SITEMAP_FILENAME;

/// 入力欄のセレクタ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSelectors {
    /// 通常の入力欄
    pub primary: String,
    /// ログイン済みのときに見えるプレースホルダー付き入力欄
    pub placeholder: String,
}

impl Default for PromptSelectors {
    fn default() -> Self {
        Self {
            primary: ".input-area rich-textarea".to_string(),
            placeholder: "rich-textarea[placeholder='Ask Gemini']".to_string(),
        }
    }
}

/// 準備待ちのポーリング設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// サンプリング間隔
    pub poll_interval: Duration,
    /// エラー表示チェックの最小間隔
    pub error_check_interval: Duration,
    /// 作業中インジケータが出ているときの待ち時間
    pub busy_backoff: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            error_check_interval: Duration::from_millis(3000),
            busy_backoff: Duration::from_millis(1500),
        }
    }
}

/// バッチ処理の各段階の待ち時間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTimings {
    /// 添付メニューを開いた後
    pub menu_pause: Duration,
    /// 「ファイルをアップロード」を押した後
    pub upload_entry_pause: Duration,
    /// ファイル入力後の基本待ち時間
    pub populate_base: Duration,
    /// ファイル入力後の1ファイルあたりの追加待ち時間
    pub populate_per_file: Duration,
    /// チップ出現待ちの基本上限
    pub chips_base: Duration,
    /// チップ出現待ちの1ファイルあたりの追加上限
    pub chips_per_file: Duration,
    /// チップ数のポーリング間隔
    pub chip_poll: Duration,
    /// メッセージ入力後
    pub after_type: Duration,
    /// 送信後の準備待ち上限
    pub ready_timeout: Duration,
    /// チップが消えるまでの待ち上限
    pub clear_timeout: Duration,
}

impl Default for UploadTimings {
    fn default() -> Self {
        Self {
            menu_pause: Duration::from_millis(3000),
            upload_entry_pause: Duration::from_millis(3500),
            populate_base: Duration::from_millis(2000),
            populate_per_file: Duration::from_millis(400),
            chips_base: Duration::from_secs(20),
            chips_per_file: Duration::from_secs(2),
            chip_poll: Duration::from_millis(500),
            after_type: Duration::from_millis(500),
            ready_timeout: Duration::from_secs(180),
            clear_timeout: Duration::from_secs(60),
        }
    }
}

impl UploadTimings {
    /// ファイル入力後の待ち時間
    pub fn populate_pause(&self, file_count: usize) -> Duration {
        self.populate_base + self.populate_per_file * file_count as u32
    }

    /// チップ出現待ちの上限
    pub fn chips_timeout(&self, file_count: usize) -> Duration {
        self.chips_base + self.chips_per_file * file_count as u32
    }
}

/// ログイン処理の待ち時間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignInTimings {
    /// ログイン済みかどうかの確認に使う待ち時間
    pub logged_in_probe: Duration,
    /// ログイン送信後、ネイティブポップアップを待つ時間
    pub popup_delay: Duration,
    /// ログイン後の準備待ち上限
    pub login_ready_timeout: Duration,
    /// プロファイル利用時の準備待ち上限
    pub profile_ready_timeout: Duration,
    /// モデル切り替えメニューが開くまで
    pub model_menu_pause: Duration,
    /// モデル選択後
    pub model_settle: Duration,
}

impl Default for SignInTimings {
    fn default() -> Self {
        Self {
            logged_in_probe: Duration::from_secs(3),
            popup_delay: Duration::from_secs(8),
            login_ready_timeout: Duration::from_secs(90),
            profile_ready_timeout: Duration::from_secs(30),
            model_menu_pause: Duration::from_millis(3000),
            model_settle: Duration::from_millis(1500),
        }
    }
}

/// アップロード設定
///
/// 実行中は変更されない
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// サイトマップのファイル名（バッチメッセージで言及する）
    pub sitemap_name: String,
    pub prompts: PromptSelectors,
    pub readiness: ReadinessPolicy,
    pub timings: UploadTimings,
    pub sign_in: SignInTimings,
    /// 選択済みとみなすモデル名のキーワード
    pub model_keywords: Vec<String>,
}

impl UploadConfig {
    /// 新しいアップロード設定を作成します。
    ///
    /// 待ち時間はすべてデフォルト値になります。
    ///
    /// ```
    /// use gemini_uploader::application::dto::upload_config::UploadConfig;
    ///
    /// let config = UploadConfig::new("project_structure_sitemap.xml".to_string());
    ///
    /// assert_eq!(config.timings.ready_timeout.as_secs(), 180);
    /// assert_eq!(config.timings.chips_timeout(10).as_secs(), 40);
    /// ```
    pub fn new(sitemap_name: String) -> Self {
        Self {
            sitemap_name,
            prompts: PromptSelectors::default(),
            readiness: ReadinessPolicy::default(),
            timings: UploadTimings::default(),
            sign_in: SignInTimings::default(),
            model_keywords: vec!["2.5 Pro".to_string(), "Pro (preview)".to_string()],
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self::new(SITEMAP_FILENAME.to_string())
    }
}
