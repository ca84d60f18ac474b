//! Coordinate Clicker
//!
//! 指定した画面座標へマウスを動かして左クリックする
//!
//! DOM から操作できないネイティブのポップアップを閉じるために
//! `gemini-uploader` から子プロセスとして呼ばれる。再試行はしない。

use anyhow::{bail, Result};
use clap::Parser;
use enigo::{Enigo, MouseButton, MouseControllable};
use log::debug;
use std::process::ExitCode;
use std::thread::sleep;
use std::time::Duration;

/// Pause between the end of the move and the button press
const SETTLE_MS: u64 = 100;
/// Pointer moves are split into steps of roughly this length
const STEP_MS: u64 = 10;
const MAX_STEPS: u64 = 1000;

#[derive(Parser, Debug)]
#[command(name = "coord-clicker")]
#[command(about = "Move the mouse to a screen coordinate and left-click", long_about = None)]
struct Args {
    // Negative values are parsed so they are rejected with a bounds message
    // instead of a usage error
    /// X coordinate on the main display (0 at its left edge)
    #[arg(long, allow_negative_numbers = true)]
    x: i32,

    /// Y coordinate on the main display (0 at its top edge)
    #[arg(long, allow_negative_numbers = true)]
    y: i32,

    /// Duration of the pointer move in milliseconds
    #[arg(long, default_value_t = 200)]
    move_ms: u64,

    /// Time between button press and release in milliseconds
    #[arg(long, default_value_t = 100)]
    click_ms: u64,
}

/// 座標がメインディスプレイ内にあるか
///
/// enigo はメインディスプレイの大きさしか返さないので、
/// 他のモニター上の座標（負の値を含む）は受け付けない
fn validate_point(x: i32, y: i32, display: (i32, i32)) -> Result<()> {
    let (width, height) = display;
    if x < 0 || y < 0 || x >= width || y >= height {
        bail!(
            "coordinates ({}, {}) are outside the main display ({}x{})",
            x,
            y,
            width,
            height
        );
    }
    Ok(())
}

/// 移動経路の中間点（終点を含む）
///
/// 分割数は 1..=1000 に収める
fn move_path(from: (i32, i32), to: (i32, i32), move_ms: u64) -> Vec<(i32, i32)> {
    let steps = (move_ms / STEP_MS).clamp(1, MAX_STEPS) as i64;
    let lerp = |a: i32, b: i32, i: i64| -> i32 {
        let (a, b) = (i64::from(a), i64::from(b));
        // Always between a and b, so it fits back into i32
        (a + (b - a) * i / steps) as i32
    };
    (1..=steps)
        .map(|i| (lerp(from.0, to.0, i), lerp(from.1, to.1, i)))
        .collect()
}

fn click_at(args: &Args) -> Result<()> {
    let mut enigo = Enigo::new();
    validate_point(args.x, args.y, enigo.main_display_size())?;

    let from = enigo.mouse_location();
    println!(
        "Moving mouse from ({}, {}) to ({}, {})...",
        from.0, from.1, args.x, args.y
    );
    let path = move_path(from, (args.x, args.y), args.move_ms);
    let step_delay = Duration::from_millis(args.move_ms / path.len() as u64);
    for (x, y) in path {
        enigo.mouse_move_to(x, y);
        sleep(step_delay);
    }
    sleep(Duration::from_millis(SETTLE_MS));

    debug!("Pressing left button for {}ms", args.click_ms);
    enigo.mouse_down(MouseButton::Left);
    sleep(Duration::from_millis(args.click_ms));
    enigo.mouse_up(MouseButton::Left);

    println!("✓ Clicked at ({}, {})", args.x, args.y);
    Ok(())
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match click_at(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ Click failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
