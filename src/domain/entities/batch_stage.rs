//! # Batch Stage
//!
//! バッチ1件分のアップロード状態機械の状態と結果

use std::fmt;

/// バッチ処理の段階
///
/// `OpeningMenu` から順に進み、`VerifyingCleared` の後で完了する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStage {
    OpeningMenu,
    AttachingFiles,
    WaitingForChips,
    ComposingMessage,
    Sending,
    AwaitingReady,
    VerifyingCleared,
}

impl BatchStage {
    /// 次の段階（最後の段階の後は `None`）
    pub fn next(self) -> Option<BatchStage> {
        match self {
            BatchStage::OpeningMenu => Some(BatchStage::AttachingFiles),
            BatchStage::AttachingFiles => Some(BatchStage::WaitingForChips),
            BatchStage::WaitingForChips => Some(BatchStage::ComposingMessage),
            BatchStage::ComposingMessage => Some(BatchStage::Sending),
            BatchStage::Sending => Some(BatchStage::AwaitingReady),
            BatchStage::AwaitingReady => Some(BatchStage::VerifyingCleared),
            BatchStage::VerifyingCleared => None,
        }
    }
}

impl fmt::Display for BatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchStage::OpeningMenu => "opening attach menu",
            BatchStage::AttachingFiles => "attaching files",
            BatchStage::WaitingForChips => "waiting for file chips",
            BatchStage::ComposingMessage => "composing message",
            BatchStage::Sending => "sending",
            BatchStage::AwaitingReady => "awaiting ready",
            BatchStage::VerifyingCleared => "verifying chips cleared",
        };
        f.write_str(s)
    }
}

/// 1段階分の遷移結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageResult {
    /// 問題なく完了
    Completed,
    /// 完了したが期待を下回った（警告のみ、処理は継続）
    Degraded(String),
}

/// バッチの終端状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Done {
        /// 検出された新しいチップ数
        new_chips: usize,
        /// 警告
        warnings: Vec<String>,
    },
    Failed {
        stage: BatchStage,
        reason: String,
    },
}
