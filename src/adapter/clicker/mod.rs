//! Coordinate Clicker Adapter
//!
//! `coord-clicker` を子プロセスとして起動し、ネイティブポップアップを閉じる

pub mod process;

pub use process::ClickerProcess;
