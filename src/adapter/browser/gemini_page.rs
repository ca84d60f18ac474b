//! Gemini Page
//!
//! `ChatPage` と `AccountPage` の WebDriver 実装

use async_trait::async_trait;
use chrono::Local;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thirtyfour::prelude::*;
use tokio::time::sleep;

use crate::adapter::browser::errors::{classify, classify_with, is_click_intercepted_error};
use crate::adapter::browser::locators::{self, Locator};
use crate::domain::errors::PageError;
use crate::domain::repositories::account_page::AccountPage;
use crate::domain::repositories::chat_page::ChatPage;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const SCROLL_CENTER_JS: &str =
    "arguments[0].scrollIntoView({behavior: 'smooth', block: 'center', inline: 'center'});";
const JS_CLICK: &str = "arguments[0].click();";

// Click timeouts
const ATTACH_CLICK_TIMEOUT: Duration = Duration::from_secs(15);
const SEND_CLICK_TIMEOUT: Duration = Duration::from_secs(7);
const SIGN_IN_CLICK_TIMEOUT: Duration = Duration::from_secs(7);
const NEXT_CLICK_TIMEOUT: Duration = Duration::from_secs(10);
const MODEL_CLICK_TIMEOUT: Duration = Duration::from_secs(15);

// Lookup timeouts
const LOGIN_FIELD_TIMEOUT: Duration = Duration::from_secs(15);
const FILE_INPUT_TIMEOUT: Duration = Duration::from_secs(5);
const PROMPT_TIMEOUT: Duration = Duration::from_secs(10);
const PROMPT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);
const MODEL_LABEL_TIMEOUT: Duration = Duration::from_secs(5);

/// スナップショットのラベルをファイル名に使える文字だけにする
///
/// ```
/// use gemini_uploader::adapter::browser::gemini_page::sanitize_label;
///
/// assert_eq!(sanitize_label("gemini_timeout_batch 2 submission"), "gemini_timeout_batch_2_submission");
/// ```
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// 現在の URL がアプリの画面か
///
/// スキームの違いは無視する
pub fn is_app_url(current_url: &str, app_url: &str) -> bool {
    let without_scheme = app_url
        .strip_prefix("https://")
        .or_else(|| app_url.strip_prefix("http://"))
        .unwrap_or(app_url);
    current_url.contains(without_scheme)
}

/// プロンプトが空（またはプレースホルダー表示中）か
///
/// `value` 属性がない要素は空とみなす
pub fn prompt_is_empty(value: Option<&str>, placeholder: Option<&str>) -> bool {
    value.unwrap_or("").is_empty() || placeholder.is_some()
}

/// Gemini 画面
pub struct GeminiPage {
    driver: WebDriver,
    app_url: String,
    snapshot_dir: PathBuf,
}

impl GeminiPage {
    /// # Arguments
    ///
    /// * `driver` - 開始済みの WebDriver セッション
    /// * `app_url` - アプリの URL
    /// * `snapshot_dir` - スクリーンショットの保存先
    pub fn new(driver: WebDriver, app_url: impl Into<String>, snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            driver,
            app_url: app_url.into(),
            snapshot_dir: snapshot_dir.into(),
        }
    }

    /// 現在の URL（取得できなければ `None`）
    pub async fn current_url(&self) -> Option<String> {
        self.driver.current_url().await.ok().map(|url| url.to_string())
    }

    /// ブラウザを閉じずにセッションを手放す
    ///
    /// `quit` フラグはクローン間で共有されるので、クローンを手放せば元の
    /// `WebDriver` が drop されてもブラウザは閉じない
    pub fn leave_open(&self) -> Result<(), PageError> {
        self.driver
            .clone()
            .leak()
            .map_err(|e| PageError::Other(format!("session already closed: {}", e)))
    }

    async fn scroll_to_center(&self, element: &WebElement) -> WebDriverResult<()> {
        self.driver
            .execute(SCROLL_CENTER_JS, vec![element.to_json()?])
            .await?;
        Ok(())
    }

    /// 表示されている要素が1つでもあるか
    async fn any_displayed(&self, locator: Locator) -> Result<bool, PageError> {
        let elements = self
            .driver
            .find_all(locator.by())
            .await
            .map_err(|e| classify(&e))?;
        for element in elements {
            if element.is_displayed().await.map_err(|e| classify(&e))? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// 要素を探し、スクロールしてクリックする
    ///
    /// クリックが他の要素に遮られた場合は JavaScript でクリックし直す
    async fn click_robustly(
        &self,
        locator: Locator,
        description: &str,
        timeout: Duration,
    ) -> Result<(), PageError> {
        let presence_wait = std::cmp::max(Duration::from_secs(2), timeout / 2);
        if let Ok(element) = self
            .driver
            .query(locator.by())
            .wait(presence_wait, POLL_INTERVAL)
            .first()
            .await
        {
            if self.scroll_to_center(&element).await.is_ok() {
                sleep(Duration::from_millis(300)).await;
            }
        }

        let element = self
            .driver
            .query(locator.by())
            .wait(timeout, POLL_INTERVAL)
            .and_clickable()
            .first()
            .await
            .map_err(|e| match classify(&e) {
                PageError::SessionLost(msg) => PageError::SessionLost(msg),
                _ => PageError::NotFound(format!(
                    "timeout waiting for '{}' to be clickable",
                    description
                )),
            })?;

        if let Err(e) = self.scroll_to_center(&element).await {
            debug!("Scroll before click failed for '{}': {}", description, e);
        }
        sleep(Duration::from_millis(500)).await;

        match element.click().await {
            Ok(()) => info!("Clicked '{}' (standard).", description),
            Err(e) if is_click_intercepted_error(&e.to_string()) => {
                warn!("Click intercepted for '{}'. Trying JS click.", description);
                self.js_click(&element, description).await?;
            }
            Err(e) => return Err(classify_with(&e, description)),
        }

        sleep(Duration::from_millis(700)).await;
        Ok(())
    }

    async fn js_click(&self, element: &WebElement, description: &str) -> Result<(), PageError> {
        self.scroll_to_center(element)
            .await
            .map_err(|e| classify_with(&e, description))?;
        sleep(Duration::from_millis(300)).await;

        if !element
            .is_displayed()
            .await
            .map_err(|e| classify_with(&e, description))?
        {
            return Err(PageError::Interaction(format!(
                "'{}' not displayed after scroll for JS click",
                description
            )));
        }

        let args = vec![element.to_json().map_err(|e| classify_with(&e, description))?];
        self.driver
            .execute(JS_CLICK, args)
            .await
            .map_err(|e| classify_with(&e, description))?;
        info!("Clicked '{}' (JS).", description);
        Ok(())
    }

    /// 候補のロケーターを順に試してクリックする
    async fn click_first(
        &self,
        candidates: &[Locator],
        description: &str,
        timeout: Duration,
    ) -> Result<(), PageError> {
        for locator in candidates {
            match self.click_robustly(*locator, description, timeout).await {
                Ok(()) => return Ok(()),
                Err(PageError::SessionLost(msg)) => return Err(PageError::SessionLost(msg)),
                Err(e) => debug!("'{}' via {} failed: {}", description, locator, e),
            }
        }
        Err(PageError::NotFound(format!(
            "failed to click {} ({} locators tried)",
            description,
            candidates.len()
        )))
    }

    /// 表示されるまで待ってから入力する
    async fn type_into(&self, locator: Locator, text: &str, what: &str) -> Result<(), PageError> {
        let input = self
            .driver
            .query(locator.by())
            .wait(LOGIN_FIELD_TIMEOUT, POLL_INTERVAL)
            .and_displayed()
            .first()
            .await
            .map_err(|e| classify_with(&e, what))?;
        input
            .send_keys(text)
            .await
            .map_err(|e| classify_with(&e, what))
    }

    fn snapshot_path(&self, label: &str) -> PathBuf {
        let file_name = format!(
            "{}_{}.png",
            sanitize_label(label),
            Local::now().format("%Y%m%d-%H%M%S")
        );
        self.snapshot_dir.join(file_name)
    }
}

#[async_trait]
impl ChatPage for GeminiPage {
    async fn error_messages(&self) -> Result<Vec<String>, PageError> {
        let elements = self
            .driver
            .find_all(locators::ERROR_MESSAGE.by())
            .await
            .map_err(|e| classify(&e))?;

        let mut messages = Vec::new();
        for element in elements {
            if !element.is_displayed().await.map_err(|e| classify(&e))? {
                continue;
            }
            let text = element.text().await.map_err(|e| classify(&e))?;
            let text = text.trim();
            if text.is_empty() {
                messages.push("(error indicator without text)".to_string());
            } else {
                messages.push(text.to_string());
            }
        }
        Ok(messages)
    }

    async fn working_indicator_visible(&self) -> Result<bool, PageError> {
        self.any_displayed(locators::WORKING_INDICATOR).await
    }

    async fn stop_control_visible(&self) -> Result<bool, PageError> {
        self.any_displayed(locators::STOP_GENERATING).await
    }

    async fn loading_spinner_visible(&self) -> Result<bool, PageError> {
        self.any_displayed(locators::LOADING_SPINNER).await
    }

    async fn prompt_accepts_input(&self, prompt_selector: &str) -> Result<bool, PageError> {
        let prompt = match self
            .driver
            .query(By::Css(prompt_selector.to_string()))
            .wait(PROMPT_PROBE_TIMEOUT, Duration::from_millis(100))
            .and_clickable()
            .first()
            .await
        {
            Ok(prompt) => prompt,
            Err(e) => {
                return match classify(&e) {
                    PageError::SessionLost(msg) => Err(PageError::SessionLost(msg)),
                    PageError::Stale(msg) => Err(PageError::Stale(msg)),
                    _ => Ok(false),
                }
            }
        };

        let value = prompt.attr("value").await.map_err(|e| classify(&e))?;
        let placeholder = prompt.attr("placeholder").await.map_err(|e| classify(&e))?;
        // rich-textarea has no value attribute, so a missing value counts as empty
        Ok(prompt_is_empty(value.as_deref(), placeholder.as_deref()))
    }

    async fn capture_snapshot(&self, label: &str) -> Option<PathBuf> {
        let path = self.snapshot_path(label);
        match self.driver.screenshot(&path).await {
            Ok(()) => {
                println!("  Screenshot saved: {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Could not save screenshot {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn attachment_chip_count(&self) -> Result<usize, PageError> {
        self.driver
            .find_all(locators::ATTACHMENT_CHIP.by())
            .await
            .map(|chips| chips.len())
            .map_err(|e| classify(&e))
    }

    async fn open_attach_menu(&self) -> Result<(), PageError> {
        self.click_first(
            locators::ATTACH_MENU,
            "'Add/Attach' (Plus) Icon",
            ATTACH_CLICK_TIMEOUT,
        )
        .await
    }

    async fn choose_upload_entry(&self) -> Result<(), PageError> {
        self.click_first(
            locators::UPLOAD_ENTRY,
            "'Upload Files' button in menu",
            ATTACH_CLICK_TIMEOUT,
        )
        .await
    }

    async fn populate_file_input(&self, paths: &[PathBuf]) -> Result<(), PageError> {
        let joined = paths
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join("\n");

        for locator in locators::FILE_INPUT {
            match self
                .driver
                .query(locator.by())
                .wait(FILE_INPUT_TIMEOUT, POLL_INTERVAL)
                .first()
                .await
            {
                Ok(input) => {
                    return input
                        .send_keys(joined.as_str())
                        .await
                        .map_err(|e| classify_with(&e, "file input"));
                }
                Err(e) => {
                    let error = classify(&e);
                    if error.is_session_lost() {
                        return Err(error);
                    }
                    debug!("File input via {} not found: {}", locator, error);
                }
            }
        }

        Err(PageError::NotFound(
            "file input element for batch upload".to_string(),
        ))
    }

    async fn type_message(&self, prompt_selector: &str, message: &str) -> Result<(), PageError> {
        let prompt = self
            .driver
            .query(By::Css(prompt_selector.to_string()))
            .wait(PROMPT_TIMEOUT, POLL_INTERVAL)
            .and_clickable()
            .first()
            .await
            .map_err(|e| classify_with(&e, "prompt input"))?;

        // The rich textarea wraps a content-editable div that actually takes keys
        let target = match prompt.find(locators::PROMPT_EDITABLE.by()).await {
            Ok(inner) => inner,
            Err(_) => prompt,
        };
        target
            .send_keys(message)
            .await
            .map_err(|e| classify_with(&e, "prompt input"))
    }

    async fn click_send(&self) -> Result<(), PageError> {
        self.click_first(
            locators::SEND,
            "Send button (batch message)",
            SEND_CLICK_TIMEOUT,
        )
        .await
    }
}

#[async_trait]
impl AccountPage for GeminiPage {
    async fn open_app(&self) -> Result<(), PageError> {
        self.driver
            .goto(self.app_url.as_str())
            .await
            .map_err(|e| classify_with(&e, "open app"))?;
        if let Some(url) = self.current_url().await {
            println!("Navigated to {}. URL: {}", self.app_url, url);
        }
        Ok(())
    }

    async fn on_app_page(&self) -> Result<bool, PageError> {
        let url = self.driver.current_url().await.map_err(|e| classify(&e))?;
        Ok(is_app_url(url.as_str(), &self.app_url))
    }

    async fn prompt_present(
        &self,
        prompt_selector: &str,
        within: Duration,
    ) -> Result<bool, PageError> {
        self.driver
            .query(By::Css(prompt_selector.to_string()))
            .wait(within, POLL_INTERVAL)
            .exists()
            .await
            .map_err(|e| classify(&e))
    }

    async fn click_sign_in(&self) -> Result<(), PageError> {
        self.click_first(
            locators::SIGN_IN,
            "Gemini Page Sign In Button",
            SIGN_IN_CLICK_TIMEOUT,
        )
        .await
    }

    async fn submit_email(&self, email: &str) -> Result<(), PageError> {
        self.type_into(locators::EMAIL_INPUT, email, "email field")
            .await?;
        self.click_robustly(locators::EMAIL_NEXT, "Email Next Button", NEXT_CLICK_TIMEOUT)
            .await
    }

    async fn submit_password(&self, password: &str) -> Result<(), PageError> {
        self.type_into(locators::PASSWORD_INPUT, password, "password field")
            .await?;
        self.click_robustly(
            locators::PASSWORD_NEXT,
            "Password Next Button",
            NEXT_CLICK_TIMEOUT,
        )
        .await
    }

    async fn current_model_label(&self) -> Result<Option<String>, PageError> {
        let label = match self
            .driver
            .query(locators::MODEL_LABEL.by())
            .wait(MODEL_LABEL_TIMEOUT, POLL_INTERVAL)
            .and_displayed()
            .first()
            .await
        {
            Ok(label) => label,
            Err(e) => {
                let error = classify(&e);
                return if error.is_session_lost() {
                    Err(error)
                } else {
                    Ok(None)
                };
            }
        };

        let text = label.text().await.map_err(|e| classify(&e))?;
        let text = text.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }

    async fn open_model_switcher(&self) -> Result<(), PageError> {
        self.click_robustly(
            locators::MODEL_SWITCHER,
            "Model Switcher Opener Button",
            MODEL_CLICK_TIMEOUT,
        )
        .await
    }

    async fn choose_target_model(&self) -> Result<(), PageError> {
        self.click_robustly(
            locators::TARGET_MODEL_OPTION,
            "Gemini 2.5 Pro Option",
            MODEL_CLICK_TIMEOUT,
        )
        .await
    }
}

/// スナップショットの保存先として使うディレクトリ
pub fn default_snapshot_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("gemini_err"), "gemini_err");
        assert_eq!(
            sanitize_label("gemini_timeout_login & pop-up handling"),
            "gemini_timeout_login___pop-up_handling"
        );
        assert_eq!(sanitize_label("a/b\\c:d"), "a_b_c_d");
    }

    #[test]
    fn test_prompt_is_empty() {
        assert!(prompt_is_empty(None, None));
        assert!(prompt_is_empty(Some(""), None));
        assert!(prompt_is_empty(Some("draft"), Some("Ask Gemini")));
        assert!(!prompt_is_empty(Some("draft"), None));
    }

    #[test]
    fn test_is_app_url() {
        let app = "https://gemini.google.com/app";
        assert!(is_app_url("https://gemini.google.com/app", app));
        assert!(is_app_url("https://gemini.google.com/app/abc123", app));
        assert!(!is_app_url("https://accounts.google.com/signin", app));
        assert!(is_app_url("http://localhost:8080/app", "localhost:8080/app"));
    }
}
