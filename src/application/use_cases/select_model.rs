//! # Select Model Use Case
//!
//! 目的のモデルが選ばれていなければ切り替える
//!
//! 失敗してもアップロードは続けられるため、このユースケースはエラーを返さない。

use log::{info, warn};
use std::sync::Arc;
use tokio::time::sleep;

use crate::application::dto::upload_config::SignInTimings;
use crate::domain::repositories::account_page::AccountPage;

/// モデル選択の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelection {
    /// すでに目的のモデルが選ばれていた（現在のラベル）
    AlreadySelected(String),
    /// 切り替えた
    Switched,
    /// 切り替えられなかった（理由）
    Skipped(String),
}

/// ラベルがキーワードのどれかを含むか（大文字小文字は区別しない）
///
/// ```
/// use gemini_uploader::application::use_cases::select_model::matches_target_model;
///
/// let keywords = vec!["2.5 Pro".to_string()];
/// assert!(matches_target_model("Gemini 2.5 pro", &keywords));
/// assert!(!matches_target_model("2.0 Flash", &keywords));
/// ```
pub fn matches_target_model(label: &str, keywords: &[String]) -> bool {
    let label = label.to_lowercase();
    keywords
        .iter()
        .any(|keyword| label.contains(&keyword.to_lowercase()))
}

/// モデル選択ユースケース
pub struct SelectModelUseCase<A: AccountPage + ?Sized> {
    account_page: Arc<A>,
    keywords: Vec<String>,
    timings: SignInTimings,
}

impl<A: AccountPage + ?Sized> SelectModelUseCase<A> {
    pub fn new(account_page: Arc<A>, keywords: Vec<String>, timings: SignInTimings) -> Self {
        Self {
            account_page,
            keywords,
            timings,
        }
    }

    pub async fn execute(&self) -> ModelSelection {
        println!("Checking selected model...");

        match self.account_page.current_model_label().await {
            Ok(Some(label)) if matches_target_model(&label, &self.keywords) => {
                println!("✓ Target model already selected: {}", label);
                return ModelSelection::AlreadySelected(label);
            }
            Ok(Some(label)) => info!("Current model is '{}', switching", label),
            Ok(None) => info!("Current model label not found, trying to switch anyway"),
            Err(e) => warn!("Could not read current model: {}", e),
        }

        if let Err(e) = self.account_page.open_model_switcher().await {
            warn!("⚠ Could not open model switcher: {}", e);
            return ModelSelection::Skipped(e.to_string());
        }
        sleep(self.timings.model_menu_pause).await;

        if let Err(e) = self.account_page.choose_target_model().await {
            warn!("⚠ Could not select target model: {}", e);
            return ModelSelection::Skipped(e.to_string());
        }
        sleep(self.timings.model_settle).await;

        println!("✓ Switched to the target model.");
        ModelSelection::Switched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::PageError;
    use crate::domain::repositories::account_page::MockAccountPage;
    use std::time::Duration;

    fn create_test_use_case(mock: MockAccountPage) -> SelectModelUseCase<MockAccountPage> {
        let timings = SignInTimings {
            model_menu_pause: Duration::ZERO,
            model_settle: Duration::ZERO,
            ..Default::default()
        };
        SelectModelUseCase::new(
            Arc::new(mock),
            vec!["2.5 Pro".to_string(), "Pro (preview)".to_string()],
            timings,
        )
    }

    #[test]
    fn test_matches_target_model_case_insensitive() {
        let keywords = vec!["Pro (preview)".to_string()];
        assert!(matches_target_model("2.5 PRO (Preview)", &keywords));
        assert!(!matches_target_model("Flash", &keywords));
        assert!(!matches_target_model("anything", &[]));
    }

    #[tokio::test]
    async fn test_already_selected_skips_switcher() {
        let mut mock = MockAccountPage::new();
        mock.expect_current_model_label()
            .returning(|| Ok(Some("2.5 Pro".to_string())));
        mock.expect_open_model_switcher().never();

        let result = create_test_use_case(mock).execute().await;
        assert_eq!(result, ModelSelection::AlreadySelected("2.5 Pro".to_string()));
    }

    #[tokio::test]
    async fn test_switches_when_other_model_selected() {
        let mut mock = MockAccountPage::new();
        mock.expect_current_model_label()
            .returning(|| Ok(Some("2.0 Flash".to_string())));
        mock.expect_open_model_switcher()
            .times(1)
            .returning(|| Ok(()));
        mock.expect_choose_target_model()
            .times(1)
            .returning(|| Ok(()));

        let result = create_test_use_case(mock).execute().await;
        assert_eq!(result, ModelSelection::Switched);
    }

    #[tokio::test]
    async fn test_failures_are_not_fatal() {
        let mut mock = MockAccountPage::new();
        mock.expect_current_model_label()
            .returning(|| Err(PageError::Other("no label".to_string())));
        mock.expect_open_model_switcher().returning(|| Ok(()));
        mock.expect_choose_target_model()
            .returning(|| Err(PageError::NotFound("model option".to_string())));

        let result = create_test_use_case(mock).execute().await;
        assert!(matches!(result, ModelSelection::Skipped(_)));
    }

    #[tokio::test]
    async fn test_switcher_missing_is_skipped() {
        let mut mock = MockAccountPage::new();
        mock.expect_current_model_label().returning(|| Ok(None));
        mock.expect_open_model_switcher()
            .returning(|| Err(PageError::NotFound("switcher".to_string())));
        mock.expect_choose_target_model().never();

        let result = create_test_use_case(mock).execute().await;
        assert!(matches!(result, ModelSelection::Skipped(_)));
    }
}
