//! # respkit-web
//!
//! axum アプリケーション向けの HTTP 規約層。
//!
//! - [`response`]: 統一レスポンス形式とエラーの変換
//! - [`validation`]: リクエストのバインドと検証
//! - [`extract`]: 検証付きエクストラクタ

pub mod extract;
pub mod response;
pub mod validation;

pub use extract::ValidJson;
pub use response::{ApiError, Envelope, Responder, resolve_failure};
