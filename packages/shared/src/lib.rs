//! # respkit 共有ユーティリティ
//!
//! 全クレート（ecode, web, api）から利用される横断的な基盤を提供する。
//!
//! ## 設計方針
//!
//! - 業務ロジックを含まない
//! - HTTP フレームワークに依存しない

pub mod observability;

pub use observability::{LogFormat, TracingConfig, TracingError, init_tracing};
