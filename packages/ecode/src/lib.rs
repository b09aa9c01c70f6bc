//! # respkit 業務エラーコード
//!
//! 業務エラーコードの定義と、HTTP ステータスへの解決ルールを提供する。
//!
//! ## 設計方針
//!
//! - HTTP フレームワークに依存しない（ステータス型は `http` クレートのみ使用）
//! - グローバル状態を持たない。[`StatusRegistry`] は起動時に構築して注入する
//! - 共通エラーは `const` として定義し、派生は `with_*` で新しい値を作る
//!
//! ## 使用例
//!
//! ```
//! use http::StatusCode;
//! use respkit_ecode::{BusinessError, StatusRegistry, code};
//!
//! let registry = StatusRegistry::with_defaults();
//!
//! assert_eq!(registry.resolve(code::NOT_FOUND.code()), StatusCode::NOT_FOUND);
//! assert_eq!(registry.resolve(2_001_001), StatusCode::OK);
//! ```

pub mod code;
pub mod error;
pub mod status;

pub use error::{BusinessError, ErrorCode};
pub use status::{StatusRegistry, status_from_code_range};
