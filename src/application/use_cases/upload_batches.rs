//! # Upload Batches Use Case
//!
//! バッチ単位でファイルを添付し、進捗メッセージを送信するユースケース
//!
//! 1バッチは `BatchStage` の順に進む。どの段階で失敗しても、そのバッチは
//! 失敗となり残りのバッチは処理しない（送信済みのバッチは取り消さない）。

use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::application::dto::upload_config::UploadConfig;
use crate::application::use_cases::await_ready::ReadinessMonitor;
use crate::domain::entities::batch_stage::{BatchOutcome, BatchStage, StageResult};
use crate::domain::entities::upload_batch::{Batches, UploadBatch};
use crate::domain::errors::{AutomationError, PageError};
use crate::domain::repositories::chat_page::ChatPage;

/// 失敗したバッチ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub number: usize,
    pub stage: BatchStage,
    pub reason: String,
}

/// アップロード結果のサマリー
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    /// 全バッチ数
    pub total_batches: usize,
    /// 完了したバッチ数（警告付きを含む）
    pub completed_batches: usize,
    /// 警告付きで完了したバッチ数
    pub degraded_batches: usize,
    /// 送信したファイル数
    pub files_sent: usize,
    /// 処理を打ち切る原因になったバッチ
    pub failure: Option<BatchFailure>,
}

impl UploadSummary {
    /// 全バッチが完了したか
    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.completed_batches == self.total_batches
    }
}

/// バッチに添える進捗メッセージ
///
/// ```
/// use gemini_uploader::application::use_cases::upload_batches::batch_message;
///
/// assert_eq!(
///     batch_message(2, 3, 25, "sitemap.xml"),
///     "Uploading Batch 2 of 3. Please continue to wait."
/// );
/// ```
pub fn batch_message(number: usize, total: usize, total_files: usize, sitemap_name: &str) -> String {
    if number == 1 {
        format!(
            "Uploading Batch 1 of {}. Project structure is in '{}' (included). Wait for all files.",
            total, sitemap_name
        )
    } else if number < total {
        format!(
            "Uploading Batch {} of {}. Please continue to wait.",
            number, total
        )
    } else {
        format!(
            "Final Batch ({}/{}). All {} files, including '{}', are now attached.",
            number, total, total_files, sitemap_name
        )
    }
}

/// 1バッチ分の途中状態
#[derive(Debug, Default)]
struct BatchContext {
    chips_before: usize,
    chips_after: usize,
    warnings: Vec<String>,
}

/// バッチアップロードユースケース
pub struct UploadBatchesUseCase<P: ChatPage + ?Sized> {
    page: Arc<P>,
    monitor: ReadinessMonitor<P>,
    config: UploadConfig,
}

impl<P: ChatPage + ?Sized> UploadBatchesUseCase<P> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `page` - チャット画面
    /// * `config` - アップロード設定
    pub fn new(page: Arc<P>, config: UploadConfig) -> Self {
        let monitor = ReadinessMonitor::new(page.clone(), config.readiness);
        Self {
            page,
            monitor,
            config,
        }
    }

    /// 全バッチを順に処理する
    ///
    /// # Arguments
    ///
    /// * `batches` - バッチのイテレータ
    /// * `prompt_selector` - 入力欄のセレクタ
    /// * `total_files` - 全ファイル数（最終バッチのメッセージに使う）
    ///
    /// # Returns
    ///
    /// 結果のサマリー。失敗したバッチがあればそこで打ち切る
    pub async fn execute(
        &self,
        batches: Batches,
        prompt_selector: &str,
        total_files: usize,
    ) -> UploadSummary {
        let mut summary = UploadSummary {
            total_batches: batches.total(),
            ..Default::default()
        };

        for batch in batches {
            println!(
                "\n--- Processing Batch {}/{} ({} files) ---",
                batch.number(),
                batch.total(),
                batch.len()
            );

            match self.process_batch(&batch, prompt_selector, total_files).await {
                BatchOutcome::Done {
                    new_chips,
                    warnings,
                } => {
                    summary.completed_batches += 1;
                    summary.files_sent += batch.len();
                    if !warnings.is_empty() {
                        summary.degraded_batches += 1;
                    }
                    println!(
                        "✓ Batch {} done ({} new file chips detected)",
                        batch.number(),
                        new_chips
                    );
                }
                BatchOutcome::Failed { stage, reason } => {
                    println!(
                        "✗ ERROR in batch {} while {}: {}",
                        batch.number(),
                        stage,
                        reason
                    );
                    self.page
                        .capture_snapshot(&format!("gemini_batch_err_{}", batch.number()))
                        .await;
                    println!("Skipping remaining batches.");
                    summary.failure = Some(BatchFailure {
                        number: batch.number(),
                        stage,
                        reason,
                    });
                    break;
                }
            }
        }

        println!("\nAll batches processed or stopped due to an error.");
        summary
    }

    /// 1バッチを状態機械に沿って処理する
    async fn process_batch(
        &self,
        batch: &UploadBatch,
        prompt_selector: &str,
        total_files: usize,
    ) -> BatchOutcome {
        let mut ctx = BatchContext::default();
        match self.page.attachment_chip_count().await {
            Ok(count) => ctx.chips_before = count,
            Err(PageError::SessionLost(msg)) => {
                return BatchOutcome::Failed {
                    stage: BatchStage::OpeningMenu,
                    reason: AutomationError::SessionLost(msg).to_string(),
                }
            }
            Err(e) => warn!("  Could not count file chips before batch: {}", e),
        }

        let mut stage = Some(BatchStage::OpeningMenu);
        while let Some(current) = stage {
            info!("  Batch {}: {}", batch.number(), current);
            match self
                .run_stage(current, batch, prompt_selector, total_files, &mut ctx)
                .await
            {
                Ok(StageResult::Completed) => {}
                Ok(StageResult::Degraded(warning)) => {
                    println!("  ⚠ Warning: {}", warning);
                    ctx.warnings.push(warning);
                }
                Err(e) => {
                    return BatchOutcome::Failed {
                        stage: current,
                        reason: e.to_string(),
                    }
                }
            }
            stage = current.next();
        }

        BatchOutcome::Done {
            new_chips: ctx.chips_after.saturating_sub(ctx.chips_before),
            warnings: ctx.warnings,
        }
    }

    async fn run_stage(
        &self,
        stage: BatchStage,
        batch: &UploadBatch,
        prompt_selector: &str,
        total_files: usize,
        ctx: &mut BatchContext,
    ) -> Result<StageResult, AutomationError> {
        let timings = &self.config.timings;

        match stage {
            BatchStage::OpeningMenu => {
                self.page.open_attach_menu().await?;
                println!("  'Add/Attach' icon clicked. Pausing for menu...");
                sleep(timings.menu_pause).await;
                Ok(StageResult::Completed)
            }
            BatchStage::AttachingFiles => {
                self.page.choose_upload_entry().await?;
                println!("  'Upload files' menu button clicked. Pausing for file dialog...");
                sleep(timings.upload_entry_pause).await;

                println!("  Sending {} file paths to input element...", batch.len());
                self.page.populate_file_input(&batch.paths()).await?;
                sleep(timings.populate_pause(batch.len())).await;
                Ok(StageResult::Completed)
            }
            BatchStage::WaitingForChips => {
                let before = ctx.chips_before;
                let timeout = timings.chips_timeout(batch.len());
                let count = self
                    .wait_for_chip_count(timeout, |count| count > before)
                    .await?
                    .ok_or_else(|| {
                        AutomationError::Interaction(format!(
                            "no new file chips appeared within {}s",
                            timeout.as_secs()
                        ))
                    })?;

                ctx.chips_after = count;
                let new_chips = count - before;
                println!(
                    "  Detected {} new file chips (total on page: {}).",
                    new_chips, count
                );
                if new_chips < batch.len() {
                    return Ok(StageResult::Degraded(format!(
                        "Expected {} new chips, but only {} appeared. Some files might not have attached.",
                        batch.len(),
                        new_chips
                    )));
                }
                Ok(StageResult::Completed)
            }
            BatchStage::ComposingMessage => {
                let message = batch_message(
                    batch.number(),
                    batch.total(),
                    total_files,
                    &self.config.sitemap_name,
                );
                self.page.type_message(prompt_selector, &message).await?;
                sleep(timings.after_type).await;
                Ok(StageResult::Completed)
            }
            BatchStage::Sending => {
                self.page.click_send().await?;
                println!("  Batch message sent. Waiting for chips to clear & Gemini ready...");
                Ok(StageResult::Completed)
            }
            BatchStage::AwaitingReady => {
                self.monitor
                    .wait_until_ready(
                        prompt_selector,
                        timings.ready_timeout,
                        &format!("batch {} submission", batch.number()),
                    )
                    .await?;
                Ok(StageResult::Completed)
            }
            BatchStage::VerifyingCleared => {
                let after = ctx.chips_after;
                let cleared = self
                    .wait_for_chip_count(timings.clear_timeout, |count| count < after || count == 0)
                    .await?;
                match cleared {
                    Some(_) => {
                        println!("  File chips seem to have been processed/cleared for this batch.");
                        Ok(StageResult::Completed)
                    }
                    None => Ok(StageResult::Degraded(
                        "File chips did not fully clear as expected after this batch's message. Manual check advised."
                            .to_string(),
                    )),
                }
            }
        }
    }

    /// チップ数が条件を満たすまでポーリングする
    ///
    /// # Returns
    ///
    /// 条件を満たしたときのチップ数。時間切れなら `None`
    async fn wait_for_chip_count<F>(
        &self,
        timeout: Duration,
        condition: F,
    ) -> Result<Option<usize>, AutomationError>
    where
        F: Fn(usize) -> bool,
    {
        let started = Instant::now();
        loop {
            match self.page.attachment_chip_count().await {
                Ok(count) if condition(count) => return Ok(Some(count)),
                Ok(_) => {}
                Err(PageError::SessionLost(msg)) => return Err(AutomationError::SessionLost(msg)),
                Err(e) => info!("  Chip count unavailable, retrying: {}", e),
            }

            if started.elapsed() >= timeout {
                return Ok(None);
            }
            sleep(self.config.timings.chip_poll).await;
        }
    }
}
