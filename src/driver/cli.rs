//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::Parser;
use std::path::PathBuf;

use crate::adapter::config::ConfigOverrides;

/// プロジェクトのファイルを Gemini にバッチでアップロードするCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "gemini-uploader")]
#[command(about = "Upload a project folder to Gemini in batches", long_about = None)]
pub struct Args {
    /// Dry run mode - generate the sitemap and print the batch plan without a browser
    #[arg(long)]
    pub dry_run: bool,

    /// Exit right away instead of waiting for Enter (the browser stays open)
    #[arg(long)]
    pub no_wait: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// JSON file overriding the scan lists
    #[arg(long)]
    pub scan_config: Option<PathBuf>,

    /// Project folder to upload (overrides TARGET_FOLDER_PATH)
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Files per batch (overrides UPLOAD_BATCH_SIZE)
    #[arg(short, long)]
    pub batch_size: Option<usize>,
}

impl Args {
    /// 設定への上書き
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            target: self.target.clone(),
            batch_size: self.batch_size,
            scan_config: self.scan_config.clone(),
        }
    }
}
