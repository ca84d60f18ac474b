//! WebDriver Error Classification
//!
//! WebDriver のエラーメッセージを分類して `PageError` に変換する

use thirtyfour::error::WebDriverError;

use crate::domain::errors::PageError;

/// Check if the browser session is gone (window closed, driver disconnected)
pub fn is_session_lost_error(error_msg: &str) -> bool {
    let lower = error_msg.to_lowercase();
    lower.contains("disconnected")
        || lower.contains("target window already closed")
        || lower.contains("no such window")
        || lower.contains("invalid session id")
        || lower.contains("chrome not reachable")
        || lower.contains("session deleted")
        || lower.contains("connection refused")
}

/// Check if an element reference went stale between lookup and use
pub fn is_stale_error(error_msg: &str) -> bool {
    let lower = error_msg.to_lowercase();
    lower.contains("stale element") || lower.contains("not attached to the page document")
}

/// Check if an element could not be located in time
pub fn is_not_found_error(error_msg: &str) -> bool {
    let lower = error_msg.to_lowercase();
    lower.contains("no such element")
        || lower.contains("not found")
        || lower.contains("timed out")
        || lower.contains("timeout")
}

/// Check if a click landed on another element
pub fn is_click_intercepted_error(error_msg: &str) -> bool {
    error_msg.to_lowercase().contains("click intercepted")
}

/// Check if an element exists but cannot be interacted with
pub fn is_interaction_error(error_msg: &str) -> bool {
    let lower = error_msg.to_lowercase();
    is_click_intercepted_error(&lower)
        || lower.contains("not interactable")
        || lower.contains("not clickable")
}

/// エラーメッセージを分類する
///
/// セッション切れを最優先で判定する（要素が見つからないように見えても、
/// ブラウザが閉じていれば再試行しても無意味なため）
pub fn classify_message(error_msg: &str) -> PageError {
    let message = error_msg.to_string();
    if is_session_lost_error(error_msg) {
        PageError::SessionLost(message)
    } else if is_stale_error(error_msg) {
        PageError::Stale(message)
    } else if is_interaction_error(error_msg) {
        PageError::Interaction(message)
    } else if is_not_found_error(error_msg) {
        PageError::NotFound(message)
    } else {
        PageError::Other(message)
    }
}

/// WebDriver のエラーを `PageError` に変換する
pub fn classify(error: &WebDriverError) -> PageError {
    classify_message(&error.to_string())
}

/// 操作の説明を付けて変換する
pub fn classify_with(error: &WebDriverError, what: &str) -> PageError {
    match classify(error) {
        PageError::SessionLost(msg) => PageError::SessionLost(msg),
        PageError::Stale(msg) => PageError::Stale(format!("{}: {}", what, msg)),
        PageError::NotFound(msg) => PageError::NotFound(format!("{}: {}", what, msg)),
        PageError::Interaction(msg) => PageError::Interaction(format!("{}: {}", what, msg)),
        PageError::Other(msg) => PageError::Other(format!("{}: {}", what, msg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_session_lost_error() {
        assert!(is_session_lost_error("chrome not reachable"));
        assert!(is_session_lost_error("disconnected: not connected to DevTools"));
        assert!(is_session_lost_error("no such window: target window already closed"));
        assert!(is_session_lost_error("invalid session id"));
        assert!(!is_session_lost_error("no such element"));
    }

    #[test]
    fn test_is_stale_error() {
        assert!(is_stale_error("stale element reference: element is not attached"));
        assert!(is_stale_error("Stale Element Reference"));
        assert!(!is_stale_error("element click intercepted"));
    }

    #[test]
    fn test_is_not_found_error() {
        assert!(is_not_found_error("no such element: Unable to locate element"));
        assert!(is_not_found_error("Element(s) not found"));
        assert!(is_not_found_error("Operation timed out"));
        assert!(!is_not_found_error("javascript error"));
    }

    #[test]
    fn test_is_interaction_error() {
        assert!(is_interaction_error("element click intercepted: Other element would receive the click"));
        assert!(is_interaction_error("element not interactable"));
        assert!(is_click_intercepted_error("Element Click Intercepted"));
        assert!(!is_click_intercepted_error("element not interactable"));
    }

    #[test]
    fn test_classify_message_priority() {
        // The session check wins even if the message also looks like a lookup failure
        assert!(classify_message("no such window while element not found").is_session_lost());
        assert!(matches!(
            classify_message("stale element reference"),
            PageError::Stale(_)
        ));
        assert!(matches!(
            classify_message("element click intercepted"),
            PageError::Interaction(_)
        ));
        assert!(matches!(
            classify_message("no such element"),
            PageError::NotFound(_)
        ));
        assert!(matches!(
            classify_message("javascript error: x is undefined"),
            PageError::Other(_)
        ));
    }
}
