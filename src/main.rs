//! Gemini Uploader
//!
//! プロジェクトのファイルをブラウザ経由で Gemini にバッチアップロード

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use anyhow::{Context, Result};
use clap::Parser;

use gemini_uploader::adapter::config::Config;
use gemini_uploader::driver::{Args, UploaderWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("gemini_uploader=info"),
    )
    .init();

    let args = Args::parse();

    // Environment: explicit file first, otherwise ./.env if present
    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file: {}", path.display()))?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    println!("--- Gemini Uploader ---");

    // Load configuration
    let config = Config::from_env(&args.overrides())?;

    // Create workflow with injected dependencies
    let workflow = UploaderWorkflow::new(config);

    let report = workflow.execute(&args).await?;
    if report.is_failure() {
        std::process::exit(1);
    }
    Ok(())
}
