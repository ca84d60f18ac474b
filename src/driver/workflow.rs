//! Workflow Orchestration
//!
//! ワークフローのオーケストレーション

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use crate::adapter::browser::gemini_page::{default_snapshot_dir, GeminiPage};
use crate::adapter::browser::session;
use crate::adapter::clicker::ClickerProcess;
use crate::adapter::config::Config;
use crate::adapter::repositories::file_project_repository::FileProjectRepository;
use crate::application::dto::upload_config::UploadConfig;
use crate::application::use_cases::select_files::SelectFilesUseCase;
use crate::application::use_cases::select_model::SelectModelUseCase;
use crate::application::use_cases::sign_in::{SignInMode, SignInOptions, SignInUseCase};
use crate::application::use_cases::upload_batches::{UploadBatchesUseCase, UploadSummary};
use crate::domain::entities::upload_batch::Batches;
use crate::domain::errors::AutomationError;
use crate::domain::repositories::account_page::AccountPage;
use crate::domain::repositories::chat_page::ChatPage;
use crate::domain::repositories::popup_dismisser::PopupDismisser;

use super::cli::Args;

/// 実行結果
#[derive(Debug)]
pub enum RunReport {
    /// アップロード対象がなかった
    NothingToUpload,
    /// ドライラン（ブラウザは起動していない）
    DryRun { files: usize, batches: usize },
    /// ブラウザでのアップロードが最後まで進んだ（一部バッチが失敗した場合を含む）
    Uploaded(UploadSummary),
    /// ブラウザ起動後に処理が中断した
    Aborted(String),
}

impl RunReport {
    /// 終了コードを 0 以外にすべき結果か
    pub fn is_failure(&self) -> bool {
        match self {
            RunReport::Uploaded(summary) => summary.failure.is_some(),
            RunReport::Aborted(_) => true,
            _ => false,
        }
    }
}

/// ログイン・モデル選択・アップロードを順に実行する
///
/// ブラウザセッションに依存しないよう、画面とクリッカーは trait で受け取る
pub async fn run_session<P, D>(
    page: Arc<P>,
    dismisser: Arc<D>,
    sign_in: SignInOptions,
    upload_config: UploadConfig,
    batches: Batches,
    total_files: usize,
) -> Result<UploadSummary, AutomationError>
where
    P: ChatPage + AccountPage + 'static,
    D: PopupDismisser + 'static,
{
    let sign_in_use_case = SignInUseCase::new(page.clone(), page.clone(), dismisser, sign_in);
    let prompt_selector = sign_in_use_case.execute().await?;
    println!("✓ Prompt '{}' ready.", prompt_selector);

    let model_use_case = SelectModelUseCase::new(
        page.clone(),
        upload_config.model_keywords.clone(),
        upload_config.sign_in,
    );
    let selection = model_use_case.execute().await;
    info!("Model selection: {:?}", selection);

    let upload_use_case = UploadBatchesUseCase::new(page, upload_config);
    Ok(upload_use_case
        .execute(batches, &prompt_selector, total_files)
        .await)
}

/// Gemini Upload Workflow
pub struct UploaderWorkflow {
    config: Config,
    select_files_use_case: SelectFilesUseCase<FileProjectRepository>,
}

impl UploaderWorkflow {
    /// Create a new workflow instance with dependency injection
    pub fn new(config: Config) -> Self {
        let project_repo = Arc::new(FileProjectRepository::new());
        let select_files_use_case = SelectFilesUseCase::new(project_repo);

        Self {
            config,
            select_files_use_case,
        }
    }

    fn upload_config(&self) -> UploadConfig {
        UploadConfig::new(self.config.filter.sitemap_name.clone())
    }

    fn sign_in_options(&self, upload_config: &UploadConfig) -> SignInOptions {
        let mode = if self.config.browser.use_profile {
            SignInMode::Profile
        } else {
            SignInMode::Fresh(self.config.credentials.clone())
        };
        SignInOptions {
            mode,
            popup_point: self.config.popup_point,
            timings: upload_config.sign_in,
            readiness: upload_config.readiness,
            prompts: upload_config.prompts.clone(),
        }
    }

    /// Execute the upload workflow
    pub async fn execute(&self, args: &Args) -> Result<RunReport> {
        info!("Starting Gemini uploader...");
        info!("Dry run: {}", args.dry_run);

        println!("✓ Using configuration:");
        println!("  Target folder: {}", self.config.target_folder.display());
        println!("  Account: {}", self.config.credentials.email());
        println!("  Batch size: {}", self.config.batch_size);
        println!(
            "  Browser: {}",
            if self.config.browser.use_profile {
                "existing Chrome profile"
            } else {
                "fresh Chrome instance"
            }
        );

        let scan = self
            .select_files_use_case
            .execute(&self.config.target_folder, &self.config.filter)
            .await?;

        if scan.files.is_empty() {
            println!("No files found to upload. Exiting.");
            return Ok(RunReport::NothingToUpload);
        }

        let total_files = scan.files.len();
        let batches = Batches::new(scan.files, self.config.batch_size);
        println!(
            "✓ Planned {} batches of up to {} files",
            batches.total(),
            batches.batch_size()
        );

        if args.dry_run {
            println!("✓ Dry-run mode (not starting a browser)");
            let total_batches = batches.total();
            for batch in batches {
                println!("  Batch {}/{}:", batch.number(), batch.total());
                for file in batch.files() {
                    println!("    - {}", file.path().display());
                }
            }
            return Ok(RunReport::DryRun {
                files: total_files,
                batches: total_batches,
            });
        }

        let driver = session::launch(&self.config.browser).await?;
        let page = Arc::new(GeminiPage::new(
            driver,
            self.config.browser.app_url.clone(),
            default_snapshot_dir(),
        ));
        let dismisser = Arc::new(ClickerProcess::new(self.config.clicker_path.clone()));

        let upload_config = self.upload_config();
        let report = match run_session(
            page.clone(),
            dismisser,
            self.sign_in_options(&upload_config),
            upload_config,
            batches,
            total_files,
        )
        .await
        {
            Ok(summary) => {
                println!(
                    "✓ {}/{} batches done ({} with warnings, {} files sent)",
                    summary.completed_batches,
                    summary.total_batches,
                    summary.degraded_batches,
                    summary.files_sent
                );
                RunReport::Uploaded(summary)
            }
            Err(e) => {
                println!("✗ MAIN ERROR: {}", e);
                if let Some(url) = page.current_url().await {
                    println!("  Current URL at error: {}", url);
                }
                page.capture_snapshot("gemini_main_error").await;
                RunReport::Aborted(e.to_string())
            }
        };

        println!("\n--- Finished ---");
        match page.leave_open() {
            Ok(()) => println!("Browser remains open. Close manually."),
            Err(e) => warn!("Could not detach from browser session: {}", e),
        }

        if !args.no_wait {
            wait_for_enter().await;
        }

        Ok(report)
    }
}

/// Enter が押されるまで待つ
#[cfg_attr(coverage_nightly, coverage(off))]
async fn wait_for_enter() {
    println!("Press Enter to exit console.");
    let read = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)
    })
    .await;
    if let Ok(Err(e)) = read {
        warn!("Could not read from stdin: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::PageError;

    #[test]
    fn test_run_report_failure() {
        assert!(!RunReport::NothingToUpload.is_failure());
        assert!(!RunReport::DryRun { files: 3, batches: 1 }.is_failure());
        assert!(RunReport::Aborted("lost".to_string()).is_failure());
        assert!(!RunReport::Uploaded(UploadSummary::default()).is_failure());
    }

    #[test]
    fn test_run_report_failed_batch_is_failure() {
        use crate::application::use_cases::upload_batches::BatchFailure;
        use crate::domain::entities::batch_stage::BatchStage;

        let summary = UploadSummary {
            total_batches: 2,
            completed_batches: 1,
            failure: Some(BatchFailure {
                number: 2,
                stage: BatchStage::Sending,
                reason: PageError::NotFound("send".to_string()).to_string(),
            }),
            ..Default::default()
        };
        assert!(RunReport::Uploaded(summary).is_failure());
    }
}
