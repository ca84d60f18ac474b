//! Browser Session
//!
//! Chrome の起動オプションを組み立て、WebDriver セッションを開始する

use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::{json, Value};
use std::time::Duration;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;

use crate::adapter::config::BrowserConfig;

/// Arguments that keep a fresh Chrome instance from showing first-run UI
const FRESH_BROWSER_ARGS: &[&str] = &[
    "--disable-extensions",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-fre",
    "--disable-default-apps",
    "--disable-popup-blocking",
    "--disable-component-update",
    "--disable-background-timer-throttling",
    "--disable-renderer-backgrounding",
    "--disable-sync",
    "--disable-blink-features=AutomationControlled",
];

const COMMON_ARGS: &[&str] = &["--start-maximized", "--force-renderer-accessibility"];

pub const EXCLUDED_SWITCHES: &[&str] = &["enable-automation", "enable-logging"];

/// Chrome のコマンドライン引数
pub fn chrome_arguments(config: &BrowserConfig) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    if config.use_profile {
        args.push(format!(
            "--user-data-dir={}",
            config.user_data_dir.display()
        ));
        args.push(format!("--profile-directory={}", config.profile_dir_name));
    } else {
        args.extend(FRESH_BROWSER_ARGS.iter().map(|a| a.to_string()));
    }
    args.extend(COMMON_ARGS.iter().map(|a| a.to_string()));
    args
}

/// 新しいブラウザで使うプリファレンス
///
/// 通知・パスワード保存・同期の案内を無効にする
pub fn fresh_browser_prefs() -> Value {
    json!({
        "profile.default_content_setting_values.notifications": 2,
        "credentials_enable_service": false,
        "profile.password_manager_enabled": false,
        "signin.allowed": false,
        "sync_promo.startup_count": -1,
        "sync_promo.show_on_first_run_allowed": false,
        "browser.show_hub_popup_on_first_run": false,
        "browser.had_previous_crash": true,
        "browser.has_seen_welcome_page": true
    })
}

/// WebDriver セッションを開始する
///
/// # Errors
///
/// オプションが不正な場合、または WebDriver（chromedriver）に接続できない場合
pub async fn launch(config: &BrowserConfig) -> Result<WebDriver> {
    let mut caps = DesiredCapabilities::chrome();

    if config.use_profile {
        if !config.user_data_dir.is_dir() {
            warn!(
                "Chrome user data dir does not exist: {}",
                config.user_data_dir.display()
            );
        }
        println!(
            "Using Chrome profile: '{}' from '{}'",
            config.profile_dir_name,
            config.user_data_dir.display()
        );
    } else {
        println!("Launching fresh Chrome instance for automated login.");
        caps.add_experimental_option("prefs", fresh_browser_prefs())
            .context("Failed to set Chrome preferences")?;
        caps.add_experimental_option("excludeSwitches", EXCLUDED_SWITCHES.to_vec())
            .context("Failed to set excluded Chrome switches")?;
    }

    for arg in chrome_arguments(config) {
        caps.add_arg(&arg)
            .with_context(|| format!("Failed to add Chrome argument: {}", arg))?;
    }

    println!("\nSetting up Chrome WebDriver...");
    let driver = WebDriver::new(config.webdriver_url.as_str(), caps)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to WebDriver at {}. Is chromedriver running?",
                config.webdriver_url
            )
        })?;
    println!("✓ Chrome session established.");
    tokio::time::sleep(Duration::from_secs(1)).await;

    if let Err(e) = driver.maximize_window().await {
        warn!("Could not maximize window: {}", e);
    }
    info!("WebDriver session started at {}", config.webdriver_url);

    Ok(driver)
}
