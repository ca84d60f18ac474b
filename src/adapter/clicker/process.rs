//! Clicker Process
//!
//! PopupDismisserの子プロセス実装

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::domain::repositories::popup_dismisser::{PopupDismisser, ScreenPoint};

/// クリッカー全体の上限時間
pub const CLICKER_TIMEOUT: Duration = Duration::from_secs(25);
pub const DEFAULT_MOVE_MS: u64 = 200;
pub const DEFAULT_CLICK_MS: u64 = 100;

/// クリッカーに渡す引数
pub fn clicker_args(point: ScreenPoint, move_ms: u64, click_ms: u64) -> Vec<String> {
    vec![
        "--x".to_string(),
        point.x.to_string(),
        "--y".to_string(),
        point.y.to_string(),
        "--move-ms".to_string(),
        move_ms.to_string(),
        "--click-ms".to_string(),
        click_ms.to_string(),
    ]
}

/// `coord-clicker` 実行ファイルを呼び出す
pub struct ClickerProcess {
    program: PathBuf,
    timeout: Duration,
    move_ms: u64,
    click_ms: u64,
}

impl ClickerProcess {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: CLICKER_TIMEOUT,
            move_ms: DEFAULT_MOVE_MS,
            click_ms: DEFAULT_CLICK_MS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl PopupDismisser for ClickerProcess {
    async fn dismiss_at(&self, point: ScreenPoint) -> Result<()> {
        if !self.program.exists() {
            bail!("clicker not found at {}", self.program.display());
        }

        info!("Running clicker {} at {}", self.program.display(), point);
        let child = Command::new(&self.program)
            .args(clicker_args(point, self.move_ms, self.click_ms))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start clicker: {}", self.program.display()))?;

        // Dropping the wait future on timeout kills the child (kill_on_drop)
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output.context("Failed to wait for clicker")?,
            Err(_) => bail!("clicker timed out after {}s", self.timeout.as_secs()),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        info!("Clicker finished with {}", output.status);
        if !stdout.trim().is_empty() {
            info!("  Clicker output: {}", stdout.trim());
        }
        if !stderr.trim().is_empty() {
            warn!("  Clicker error output: {}", stderr.trim());
        }

        if !output.status.success() {
            bail!("clicker exited with {}: {}", output.status, stderr.trim());
        }
        Ok(())
    }
}
