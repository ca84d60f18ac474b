//! # Sign In Use Case
//!
//! アプリ画面を開き、必要ならログインして入力欄を使える状態にする

use log::{info, warn};
use std::sync::Arc;
use tokio::time::sleep;

use crate::application::dto::credentials::Credentials;
use crate::application::dto::upload_config::{PromptSelectors, ReadinessPolicy, SignInTimings};
use crate::application::use_cases::await_ready::ReadinessMonitor;
use crate::domain::errors::AutomationError;
use crate::domain::repositories::account_page::AccountPage;
use crate::domain::repositories::chat_page::ChatPage;
use crate::domain::repositories::popup_dismisser::{PopupDismisser, ScreenPoint};

/// ブラウザの起動方法
#[derive(Debug, Clone)]
pub enum SignInMode {
    /// ログイン済みのプロファイルを使う
    Profile,
    /// 新しいブラウザでメールアドレスとパスワードを入力する
    Fresh(Credentials),
}

/// ログインの設定
#[derive(Debug, Clone)]
pub struct SignInOptions {
    pub mode: SignInMode,
    /// ログイン後に出るネイティブポップアップの座標（未設定ならスキップ）
    pub popup_point: Option<ScreenPoint>,
    pub timings: SignInTimings,
    pub readiness: ReadinessPolicy,
    pub prompts: PromptSelectors,
}

/// ログインユースケース
pub struct SignInUseCase<A, C, D>
where
    A: AccountPage + ?Sized,
    C: ChatPage + ?Sized,
    D: PopupDismisser + ?Sized,
{
    account_page: Arc<A>,
    monitor: ReadinessMonitor<C>,
    dismisser: Arc<D>,
    options: SignInOptions,
}

impl<A, C, D> SignInUseCase<A, C, D>
where
    A: AccountPage + ?Sized,
    C: ChatPage + ?Sized,
    D: PopupDismisser + ?Sized,
{
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `account_page` - ログイン画面の操作
    /// * `chat_page` - 準備完了の判定に使うチャット画面
    /// * `dismisser` - ネイティブポップアップを閉じるクリッカー
    /// * `options` - ログイン設定
    pub fn new(
        account_page: Arc<A>,
        chat_page: Arc<C>,
        dismisser: Arc<D>,
        options: SignInOptions,
    ) -> Self {
        let monitor = ReadinessMonitor::new(chat_page, options.readiness);
        Self {
            account_page,
            monitor,
            dismisser,
            options,
        }
    }

    /// ログインを実行する
    ///
    /// # Returns
    ///
    /// 以降の操作に使う入力欄のセレクタ
    ///
    /// # Errors
    ///
    /// ログインボタンや入力欄を操作できない場合、または画面が準備完了に
    /// ならない場合
    pub async fn execute(&self) -> Result<String, AutomationError> {
        match &self.options.mode {
            SignInMode::Profile => self.open_with_profile().await,
            SignInMode::Fresh(credentials) => self.sign_in_fresh(credentials).await,
        }
    }

    async fn open_with_profile(&self) -> Result<String, AutomationError> {
        if self.account_page.on_app_page().await? {
            println!("Already on the Gemini app page (profile).");
        } else {
            println!("Navigating to Gemini with the existing profile...");
            self.account_page.open_app().await?;
        }

        self.monitor
            .wait_until_ready(
                &self.options.prompts.primary,
                self.options.timings.profile_ready_timeout,
                "profile page load",
            )
            .await?;
        self.resolve_prompt_selector().await
    }

    async fn sign_in_fresh(&self, credentials: &Credentials) -> Result<String, AutomationError> {
        let prompts = &self.options.prompts;
        let timings = &self.options.timings;

        println!("Opening Gemini in a fresh browser...");
        self.account_page.open_app().await?;

        if self
            .account_page
            .prompt_present(&prompts.placeholder, timings.logged_in_probe)
            .await?
        {
            println!("✓ Already logged in.");
            return Ok(prompts.placeholder.clone());
        }

        println!("Not logged in. Attempting login...");
        self.account_page
            .click_sign_in()
            .await
            .map_err(|e| AutomationError::Interaction(format!("could not click 'Sign in': {}", e)))?;
        self.account_page.submit_email(credentials.email()).await?;
        info!("Email entered for {}", credentials.email());
        self.account_page
            .submit_password(credentials.expose_password())
            .await?;
        println!("Login submitted. Waiting for pop-ups...");

        sleep(timings.popup_delay).await;
        self.dismiss_popup().await;

        self.account_page.open_app().await?;
        self.monitor
            .wait_until_ready(
                &prompts.primary,
                timings.login_ready_timeout,
                "login & pop-up handling",
            )
            .await?;

        self.resolve_prompt_selector().await
    }

    /// ポップアップを閉じる。失敗しても警告のみでログインは続行する
    async fn dismiss_popup(&self) {
        let Some(point) = self.options.popup_point else {
            info!("No pop-up coordinates configured, skipping native click.");
            return;
        };

        println!("Clicking native pop-up at {}...", point);
        match self.dismisser.dismiss_at(point).await {
            Ok(()) => println!("✓ Native pop-up click sent."),
            Err(e) => warn!("⚠ Native pop-up click failed: {:#}", e),
        }
    }

    /// プレースホルダー付きの入力欄があればそれを、なければ通常の入力欄を使う
    async fn resolve_prompt_selector(&self) -> Result<String, AutomationError> {
        let prompts = &self.options.prompts;
        let selector = if self
            .account_page
            .prompt_present(&prompts.placeholder, self.options.timings.logged_in_probe)
            .await?
        {
            prompts.placeholder.clone()
        } else {
            prompts.primary.clone()
        };
        info!("Using prompt selector: {}", selector);
        Ok(selector)
    }
}
