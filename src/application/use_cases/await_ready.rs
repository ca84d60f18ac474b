//! # Readiness Monitor
//!
//! チャット画面が次の操作を受け付けられる状態になるまで待つ
//!
//! 画面には「完了」を示す確実なシグナルがなく、エラー表示・作業中表示・
//! 生成停止ボタン・入力欄の状態を毎回サンプリングして判定する。

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::application::dto::upload_config::ReadinessPolicy;
use crate::domain::entities::readiness::{BusyReason, PageSample, ReadinessSignal};
use crate::domain::errors::{AutomationError, PageError};
use crate::domain::repositories::chat_page::ChatPage;

/// 準備完了待ち
pub struct ReadinessMonitor<P: ChatPage + ?Sized> {
    page: Arc<P>,
    policy: ReadinessPolicy,
}

impl<P: ChatPage + ?Sized> ReadinessMonitor<P> {
    /// # Arguments
    ///
    /// * `page` - 観測対象の画面
    /// * `policy` - ポーリング間隔など
    pub fn new(page: Arc<P>, policy: ReadinessPolicy) -> Self {
        Self { page, policy }
    }

    /// 画面が準備完了になるまで待つ
    ///
    /// # Arguments
    ///
    /// * `prompt_selector` - 入力欄のセレクタ
    /// * `timeout` - 最大待ち時間
    /// * `action` - 待っている操作の名前（ログとエラーに使う）
    ///
    /// # Errors
    ///
    /// - エラー表示を検出した場合は即座に `AutomationError::Interface`
    /// - セッションが失われた場合は即座に `AutomationError::SessionLost`
    /// - 時間内に準備完了にならなかった場合は `AutomationError::Timeout`
    pub async fn wait_until_ready(
        &self,
        prompt_selector: &str,
        timeout: Duration,
        action: &str,
    ) -> Result<(), AutomationError> {
        println!(
            "Waiting for Gemini after '{}' (max {}s)...",
            action,
            timeout.as_secs()
        );

        let started = Instant::now();
        let mut last_error_check: Option<Instant> = None;

        while started.elapsed() < timeout {
            let pause = match self.sample(prompt_selector, &mut last_error_check).await {
                Ok(sample) => match ReadinessSignal::from_sample(&sample) {
                    ReadinessSignal::Ready => {
                        println!("✓ Gemini ready after '{}'.", action);
                        return Ok(());
                    }
                    ReadinessSignal::Error(messages) => {
                        println!("✗ Gemini error while waiting for '{}': {:?}", action, messages);
                        let snapshot = self.page.capture_snapshot("gemini_err").await;
                        return Err(AutomationError::Interface {
                            action: action.to_string(),
                            messages,
                            snapshot,
                        });
                    }
                    ReadinessSignal::Busy(BusyReason::Working) => {
                        info!("  Gemini is thinking...");
                        self.policy.busy_backoff
                    }
                    ReadinessSignal::Busy(reason) => {
                        debug!("  Not ready yet: {}", reason);
                        self.policy.poll_interval
                    }
                },
                Err(PageError::Stale(msg)) => {
                    debug!("  Stale element during wait, retrying: {}", msg);
                    self.policy.poll_interval
                }
                Err(PageError::SessionLost(msg)) => {
                    warn!("  Browser seems to have closed or disconnected during wait: {}", msg);
                    return Err(AutomationError::SessionLost(msg));
                }
                Err(other) => {
                    warn!("  Driver error during wait: {}", other);
                    self.policy.poll_interval
                }
            };

            sleep(pause).await;
        }

        let snapshot = self
            .page
            .capture_snapshot(&format!("gemini_timeout_{}", action))
            .await;
        Err(AutomationError::Timeout {
            action: action.to_string(),
            waited: timeout,
            snapshot,
        })
    }

    /// 1回分のサンプリング
    ///
    /// エラー表示のチェックは `error_check_interval` ごとにしか行わない。
    /// 作業中インジケータが出ている間は他の項目を調べない。
    async fn sample(
        &self,
        prompt_selector: &str,
        last_error_check: &mut Option<Instant>,
    ) -> Result<PageSample, PageError> {
        let mut sample = PageSample::default();

        let error_check_due = last_error_check
            .map(|at| at.elapsed() >= self.policy.error_check_interval)
            .unwrap_or(true);
        if error_check_due {
            let messages = self.page.error_messages().await?;
            if !messages.is_empty() {
                sample.error_messages = Some(messages);
                return Ok(sample);
            }
            sample.error_messages = Some(messages);
            *last_error_check = Some(Instant::now());
        }

        sample.working = self.page.working_indicator_visible().await?;
        if sample.working {
            return Ok(sample);
        }

        sample.stop_visible = self.page.stop_control_visible().await?;
        sample.loading_visible = self.page.loading_spinner_visible().await?;
        sample.prompt_ready = self.page.prompt_accepts_input(prompt_selector).await?;

        Ok(sample)
    }
}
