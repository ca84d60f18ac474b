//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **SelectFilesUseCase**: ファイル選択とサイトマップ生成
//! - **ReadinessMonitor**: 画面の準備完了待ち
//! - **UploadBatchesUseCase**: バッチ単位のファイル添付と送信
//! - **SignInUseCase**: ログイン
//! - **SelectModelUseCase**: モデル選択（ベストエフォート）

pub mod await_ready;
pub mod select_files;
pub mod select_model;
pub mod sign_in;
pub mod upload_batches;
