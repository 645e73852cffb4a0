//! MediScan CLI ライブラリ
//!
//! 胸部X線画像の模擬解析を端末から実行する。

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod upload;
