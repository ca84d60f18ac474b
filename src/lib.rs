//! # Gemini Uploader
//!
//! プロジェクトフォルダのファイルをブラウザ経由で Gemini にバッチアップロードするツール
//!
//! このプロジェクトはクリーンアーキテクチャを採用しており、以下の4層で構成されています：
//!
//! - **Domain層**: ファイル選択・バッチ分割・準備判定のルールとエンティティ（外部依存なし）
//! - **Application層**: ログイン・準備待ち・バッチアップロードのユースケース
//! - **Adapter層**: 外部システムとの統合（WebDriver, ファイルシステム, クリッカー, 環境変数）
//! - **Driver層**: CLI、依存性注入
//!
//! 座標クリッカー（`coord-clicker`）は別バイナリとして `src/bin/` にある。

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
// カバレッジ計測時にブラウザや標準入力に依存するコードを除外するために使用
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（Presentation）
pub mod driver;
