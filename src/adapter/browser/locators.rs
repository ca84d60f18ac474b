//! Page Locators
//!
//! Gemini 画面とログイン画面の要素ロケーター
//!
//! 画面のマークアップが変わったときに直すのはこのファイルだけで済むようにする。
//! 候補が複数あるものは先頭から順に試す。

use thirtyfour::By;

/// 要素の探し方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    XPath(&'static str),
    Css(&'static str),
    Id(&'static str),
}

impl Locator {
    pub fn by(&self) -> By {
        match *self {
            Locator::XPath(xpath) => By::XPath(xpath),
            Locator::Css(css) => By::Css(css),
            Locator::Id(id) => By::Id(id),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::XPath(xpath) => write!(f, "xpath={}", xpath),
            Locator::Css(css) => write!(f, "css={}", css),
            Locator::Id(id) => write!(f, "id={}", id),
        }
    }
}

// Status indicators
pub const STOP_GENERATING: Locator = Locator::XPath(
    "//button[contains(@aria-label, 'Stop generating') or contains(@aria-label, 'Cancel') or contains(@data-testid, 'stop-generating')]",
);
pub const LOADING_SPINNER: Locator = Locator::XPath(
    "//div[contains(@class, 'spinner') or contains(@class, 'loading') or @aria-label='Loading' or @role='progressbar']",
);
pub const ERROR_MESSAGE: Locator = Locator::XPath(
    "//*[contains(text(), 'Something went wrong') or contains(@class, 'error-message') or contains(text(), 'An error occurred') or contains(text(), 'Unable to reach Gemini') or contains(@class, 'response-error')]",
);
pub const WORKING_INDICATOR: Locator =
    Locator::XPath("//*[contains(text(), 'Just a sec...') or contains(text(), 'Generating...')]");

// Sign-in flow
pub const SIGN_IN: &[Locator] = &[
    Locator::XPath(
        "//a[contains(translate(., 'SIGN IN', 'sign in'), 'sign in') and contains(@href, 'accounts.google.com')]",
    ),
    Locator::XPath("//button[contains(translate(., 'SIGN IN', 'sign in'), 'sign in')]"),
];
pub const EMAIL_INPUT: Locator = Locator::Id("identifierId");
pub const EMAIL_NEXT: Locator = Locator::Id("identifierNext");
pub const PASSWORD_INPUT: Locator = Locator::Css("input[type='password'][name='Passwd']");
pub const PASSWORD_NEXT: Locator = Locator::Id("passwordNext");

// Model selection
pub const MODEL_LABEL: Locator = Locator::XPath(
    "//button[contains(@aria-label, 'model') or contains(@data-testid, 'model-switcher') or (.//span[contains(text(), 'Pro') or contains(text(), 'Flash') or contains(text(), 'Ultra') or contains(text(), 'Gemini')])]//span[1]",
);
pub const MODEL_SWITCHER: Locator = Locator::XPath(
    "//button[contains(@aria-label, 'model') or contains(@data-testid, 'model-switcher') or (.//span[contains(text(), 'Pro') or contains(text(), 'Flash') or contains(text(), 'Ultra') or contains(text(), 'Gemini')])][.//mat-icon[contains(@fonticon, 'drop_down') or contains(@class, 'drop-down')]]",
);
pub const TARGET_MODEL_OPTION: Locator = Locator::XPath(
    "//button[.//span[contains(text(), 'Gemini 2.5 Pro') and contains(text(), 'preview')]]",
);

// File upload
pub const ATTACH_MENU: &[Locator] = &[
    Locator::XPath("//button[@aria-label='Open upload file menu']"),
    Locator::XPath("//button[.//mat-icon[@fonticon='add_2']]"),
];
pub const UPLOAD_ENTRY: &[Locator] = &[
    Locator::Css("button[data-test-id='local-image-file-uploader-button']"),
    Locator::XPath(
        "//button[contains(normalize-space(.), 'Upload file') or contains(normalize-space(.), 'Upload from computer')]",
    ),
];
pub const FILE_INPUT: &[Locator] = &[
    Locator::Css("input[type='file']"),
    Locator::XPath(
        "//input[@type='file' and (contains(@style,'display: none') or contains(@class,'hidden'))]",
    ),
];
pub const ATTACHMENT_CHIP: Locator = Locator::Css("div[data-test-id='file-preview']");
pub const PROMPT_EDITABLE: Locator = Locator::Css("div[contenteditable='true']");
pub const SEND: &[Locator] = &[
    Locator::XPath("//button[@aria-label='Send message']"),
    Locator::XPath("//button[@data-testid='send-button']"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_display() {
        assert_eq!(EMAIL_INPUT.to_string(), "id=identifierId");
        assert_eq!(ATTACHMENT_CHIP.to_string(), "css=div[data-test-id='file-preview']");
    }

    #[test]
    fn test_alternatives_are_ordered() {
        assert_eq!(SIGN_IN.len(), 2);
        assert_eq!(ATTACH_MENU[0], Locator::XPath("//button[@aria-label='Open upload file menu']"));
        assert!(matches!(FILE_INPUT[0], Locator::Css(_)));
        assert_eq!(SEND.len(), 2);
    }
}
