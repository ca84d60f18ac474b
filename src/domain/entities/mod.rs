//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **FileEntry / ProjectScan**: アップロード対象ファイルとスキャン結果
//! - **UploadBatch / Batches**: アップロードバッチと遅延分割
//! - **PageSample / ReadinessSignal**: ページの準備状態
//! - **BatchStage / BatchOutcome**: バッチ処理の状態機械

pub mod batch_stage;
pub mod file_entry;
pub mod readiness;
pub mod upload_batch;
