//! # Readiness Signal
//!
//! ページの1回のサンプリング結果と、そこから導かれる準備状態

/// 1回のポーリングで観測したページの状態
///
/// `error_messages` はエラーチェックを間引いた回では `None` になる
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSample {
    /// 表示中のエラーメッセージ（チェックしなかった場合は `None`）
    pub error_messages: Option<Vec<String>>,
    /// 「Just a sec...」などの作業中インジケータ
    pub working: bool,
    /// 生成停止ボタン
    pub stop_visible: bool,
    /// ローディングスピナー
    pub loading_visible: bool,
    /// 入力欄が操作可能かつ空（またはプレースホルダー表示）
    pub prompt_ready: bool,
}

/// ビジーの理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyReason {
    Working,
    Generating,
    Loading,
    PromptUnavailable,
}

impl std::fmt::Display for BusyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BusyReason::Working => "assistant is working",
            BusyReason::Generating => "generation in progress",
            BusyReason::Loading => "page is loading",
            BusyReason::PromptUnavailable => "prompt not interactable",
        };
        f.write_str(s)
    }
}

/// 準備状態 {busy, error, ready}
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessSignal {
    Busy(BusyReason),
    Error(Vec<String>),
    Ready,
}

impl ReadinessSignal {
    /// サンプルから準備状態を判定
    ///
    /// エラー表示が最優先。入力欄が使え、作業中・生成中・ローディングの
    /// いずれも表示されていない場合のみ `Ready`。
    pub fn from_sample(sample: &PageSample) -> Self {
        if let Some(messages) = &sample.error_messages {
            if !messages.is_empty() {
                return ReadinessSignal::Error(messages.clone());
            }
        }
        if sample.working {
            return ReadinessSignal::Busy(BusyReason::Working);
        }
        if sample.stop_visible {
            return ReadinessSignal::Busy(BusyReason::Generating);
        }
        if sample.loading_visible {
            return ReadinessSignal::Busy(BusyReason::Loading);
        }
        if !sample.prompt_ready {
            return ReadinessSignal::Busy(BusyReason::PromptUnavailable);
        }
        ReadinessSignal::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_sample() -> PageSample {
        PageSample {
            error_messages: Some(vec![]),
            prompt_ready: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_ready_when_idle_and_prompt_ok() {
        assert_eq!(
            ReadinessSignal::from_sample(&ready_sample()),
            ReadinessSignal::Ready
        );
    }

    #[test]
    fn test_ready_without_error_check() {
        let sample = PageSample {
            error_messages: None,
            ..ready_sample()
        };
        assert!(matches!(
            ReadinessSignal::from_sample(&sample),
            ReadinessSignal::Ready
        ));
    }

    #[test]
    fn test_error_wins_over_everything() {
        let sample = PageSample {
            error_messages: Some(vec!["Something went wrong".to_string()]),
            working: true,
            stop_visible: true,
            ..ready_sample()
        };
        assert_eq!(
            ReadinessSignal::from_sample(&sample),
            ReadinessSignal::Error(vec!["Something went wrong".to_string()])
        );
    }

    #[test]
    fn test_busy_when_stop_visible() {
        let sample = PageSample {
            stop_visible: true,
            ..ready_sample()
        };
        assert_eq!(
            ReadinessSignal::from_sample(&sample),
            ReadinessSignal::Busy(BusyReason::Generating)
        );
    }

    #[test]
    fn test_busy_when_loading() {
        let sample = PageSample {
            loading_visible: true,
            ..ready_sample()
        };
        assert_eq!(
            ReadinessSignal::from_sample(&sample),
            ReadinessSignal::Busy(BusyReason::Loading)
        );
    }

    #[test]
    fn test_busy_when_prompt_unavailable() {
        let sample = PageSample {
            prompt_ready: false,
            ..ready_sample()
        };
        assert_eq!(
            ReadinessSignal::from_sample(&sample),
            ReadinessSignal::Busy(BusyReason::PromptUnavailable)
        );
    }

    #[test]
    fn test_working_indicator() {
        let sample = PageSample {
            working: true,
            ..ready_sample()
        };
        assert_eq!(
            ReadinessSignal::from_sample(&sample),
            ReadinessSignal::Busy(BusyReason::Working)
        );
    }
}
