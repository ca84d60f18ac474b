//! Browser Adapter
//!
//! WebDriver（thirtyfour）によるブラウザ操作

pub mod errors;
pub mod gemini_page;
pub mod locators;
pub mod session;

pub use gemini_page::GeminiPage;
