//! Workflow Integration Tests
//!
//! UploaderWorkflow の統合テスト（ブラウザを起動しないドライラン）

use clap::Parser;
use gemini_uploader::adapter::config::{
    Config, ConfigOverrides, ENV_BATCH_SIZE, ENV_EMAIL, ENV_PASSWORD, ENV_TARGET_FOLDER,
};
use gemini_uploader::domain::services::file_filter::SITEMAP_FILENAME;
use gemini_uploader::driver::cli::Args;
use gemini_uploader::driver::workflow::{RunReport, UploaderWorkflow};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// テスト用のプロジェクトを作成
fn create_test_project(dir: &Path) {
    fs::write(dir.join("README.md"), "# demo").unwrap();
    fs::write(dir.join("main.py"), "print('hi')").unwrap();
    fs::write(dir.join("notes.bin"), [0u8, 1, 2]).unwrap();
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(dir.join("src/app.js"), "export {}").unwrap();
    fs::create_dir_all(dir.join("node_modules/left-pad")).unwrap();
    fs::write(dir.join("node_modules/left-pad/index.js"), "").unwrap();
}

fn create_test_config(target: &Path, overrides: &ConfigOverrides) -> Config {
    let env: HashMap<&str, String> = HashMap::from([
        (ENV_EMAIL, "tester@example.com".to_string()),
        (ENV_PASSWORD, "secret".to_string()),
        (ENV_TARGET_FOLDER, target.to_string_lossy().to_string()),
        (ENV_BATCH_SIZE, "2".to_string()),
    ]);
    Config::from_lookup(|key| env.get(key).cloned(), overrides).unwrap()
}

#[tokio::test]
async fn test_workflow_execute_dry_run_success() {
    let temp_dir = TempDir::new().unwrap();
    create_test_project(temp_dir.path());

    let args = Args::parse_from(["gemini-uploader", "--dry-run", "--no-wait"]);
    let config = create_test_config(temp_dir.path(), &args.overrides());
    let workflow = UploaderWorkflow::new(config);

    let result = workflow.execute(&args).await;

    assert!(
        result.is_ok(),
        "Workflow should succeed in dry-run mode, but got: {:?}",
        result.err()
    );
    let report = result.unwrap();
    // README.md, main.py, src/app.js and the sitemap
    match report {
        RunReport::DryRun { files, batches } => {
            assert_eq!(files, 4);
            assert_eq!(batches, 2);
        }
        other => panic!("expected a dry-run report, got {:?}", other),
    }
    assert!(!report.is_failure());
}

#[tokio::test]
async fn test_workflow_dry_run_writes_sitemap() {
    let temp_dir = TempDir::new().unwrap();
    create_test_project(temp_dir.path());

    let args = Args::parse_from(["gemini-uploader", "--dry-run", "--no-wait"]);
    let config = create_test_config(temp_dir.path(), &args.overrides());
    UploaderWorkflow::new(config).execute(&args).await.unwrap();

    let sitemap = fs::read_to_string(temp_dir.path().join(SITEMAP_FILENAME)).unwrap();
    assert!(sitemap.contains("README.md"));
    assert!(sitemap.contains("├── src/"));
    assert!(sitemap.contains("app.js"));
    assert!(!sitemap.contains("node_modules"));
    assert!(!sitemap.contains("notes.bin"));
    assert!(!sitemap.contains(SITEMAP_FILENAME));
}

#[tokio::test]
async fn test_workflow_batch_size_override() {
    let temp_dir = TempDir::new().unwrap();
    create_test_project(temp_dir.path());

    let args = Args::parse_from(["gemini-uploader", "--dry-run", "--no-wait", "-b", "10"]);
    let config = create_test_config(temp_dir.path(), &args.overrides());
    let report = UploaderWorkflow::new(config).execute(&args).await.unwrap();

    assert!(matches!(report, RunReport::DryRun { files: 4, batches: 1 }));
}

#[tokio::test]
async fn test_workflow_nothing_to_upload() {
    let temp_dir = TempDir::new().unwrap();
    create_test_project(temp_dir.path());
    let scan_config = temp_dir.path().join("scan.json");
    fs::write(&scan_config, r#"{"subfolders": ["does-not-exist"]}"#).unwrap();

    let args = Args::parse_from([
        "gemini-uploader",
        "--no-wait",
        "--scan-config",
        scan_config.to_str().unwrap(),
    ]);
    let config = create_test_config(temp_dir.path(), &args.overrides());
    let report = UploaderWorkflow::new(config).execute(&args).await.unwrap();

    assert!(matches!(report, RunReport::NothingToUpload));
    assert!(!report.is_failure());
    assert!(!temp_dir.path().join(SITEMAP_FILENAME).exists());
}

#[test]
fn test_config_rejects_missing_target_folder() {
    let env: HashMap<&str, String> = HashMap::from([
        (ENV_EMAIL, "tester@example.com".to_string()),
        (ENV_PASSWORD, "secret".to_string()),
        (ENV_TARGET_FOLDER, "/nonexistent/gemini-uploader-target".to_string()),
    ]);

    let result = Config::from_lookup(|key| env.get(key).cloned(), &ConfigOverrides::default());

    assert!(result.is_err());
}
