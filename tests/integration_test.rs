//! Integration tests for gemini-uploader
//!
//! These tests verify file selection and batching end to end.
//! The browser test requires a running chromedriver and a Google account.

use gemini_uploader::adapter::repositories::file_project_repository::FileProjectRepository;
use gemini_uploader::application::use_cases::select_files::SelectFilesUseCase;
use gemini_uploader::application::use_cases::upload_batches::batch_message;
use gemini_uploader::domain::entities::upload_batch::Batches;
use gemini_uploader::domain::services::file_filter::{FilterConfig, SITEMAP_FILENAME};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn create_project(dir: &Path, count: usize) {
    fs::create_dir_all(dir.join("src")).unwrap();
    for i in 0..count {
        fs::write(dir.join("src").join(format!("mod_{:02}.py", i)), "pass").unwrap();
    }
}

fn select_files_use_case() -> SelectFilesUseCase<FileProjectRepository> {
    SelectFilesUseCase::new(Arc::new(FileProjectRepository::new()))
}

#[tokio::test]
async fn test_selection_includes_sitemap_once() {
    let temp_dir = TempDir::new().unwrap();
    create_project(temp_dir.path(), 3);

    let first = select_files_use_case()
        .execute(temp_dir.path(), &FilterConfig::default())
        .await
        .unwrap();
    // Second run finds the sitemap written by the first
    let second = select_files_use_case()
        .execute(temp_dir.path(), &FilterConfig::default())
        .await
        .unwrap();

    for scan in [&first, &second] {
        let sitemaps = scan
            .files
            .iter()
            .filter(|f| f.path().ends_with(SITEMAP_FILENAME))
            .count();
        assert_eq!(sitemaps, 1);
        assert_eq!(scan.files.len(), 4);
    }
}

#[tokio::test]
async fn test_selection_files_are_absolute_and_sorted() {
    let temp_dir = TempDir::new().unwrap();
    create_project(temp_dir.path(), 5);

    let scan = select_files_use_case()
        .execute(temp_dir.path(), &FilterConfig::default())
        .await
        .unwrap();

    assert!(scan.files.iter().all(|f| f.path().is_absolute()));
    let mut sorted = scan.files.clone();
    sorted.sort();
    assert_eq!(scan.files, sorted);
}

#[tokio::test]
async fn test_selection_split_into_batches() {
    let temp_dir = TempDir::new().unwrap();
    create_project(temp_dir.path(), 22);

    let scan = select_files_use_case()
        .execute(temp_dir.path(), &FilterConfig::default())
        .await
        .unwrap();
    let total_files = scan.files.len();
    let batches = Batches::new(scan.files, 10);

    assert_eq!(total_files, 23);
    assert_eq!(batches.total(), 3);
    let sizes: Vec<usize> = batches.map(|b| b.len()).collect();
    assert_eq!(sizes, vec![10, 10, 3]);
}

#[test]
fn test_batch_messages_mention_sitemap_first_and_last() {
    let first = batch_message(1, 3, 23, SITEMAP_FILENAME);
    let middle = batch_message(2, 3, 23, SITEMAP_FILENAME);
    let last = batch_message(3, 3, 23, SITEMAP_FILENAME);

    assert!(first.contains(SITEMAP_FILENAME));
    assert!(last.contains("23"));
    assert_ne!(first, middle);
    assert_ne!(middle, last);
}

/// Integration test that drives a real browser
/// Run with: cargo test --test integration_test -- --ignored
#[tokio::test]
#[ignore]
async fn test_gemini_upload_e2e() {
    // This test requires:
    // - chromedriver listening on WEBDRIVER_URL (default http://localhost:9515)
    // - GEMINI_UPLOADER_EMAIL / GEMINI_UPLOADER_PASSWORD, or USE_CHROME_PROFILE=true
    use clap::Parser;
    use gemini_uploader::adapter::config::{Config, ConfigOverrides};
    use gemini_uploader::driver::cli::Args;
    use gemini_uploader::driver::workflow::{RunReport, UploaderWorkflow};

    let _ = dotenvy::dotenv();
    let temp_dir = TempDir::new().unwrap();
    create_project(temp_dir.path(), 2);

    let overrides = ConfigOverrides {
        target: Some(temp_dir.path().to_path_buf()),
        ..Default::default()
    };
    let config = Config::from_env(&overrides).expect("credentials required for E2E test");
    let args = Args::parse_from(["gemini-uploader", "--no-wait"]);

    let report = UploaderWorkflow::new(config).execute(&args).await.unwrap();

    assert!(matches!(report, RunReport::Uploaded(_)));
    assert!(!report.is_failure(), "upload failed: {:?}", report);
}
