//! # リクエスト検証
//!
//! - [`Binder`]: JSON ボディのバインドと検証
//! - [`Translator`]: 検証メッセージのロケール別テンプレート
//! - [`Rule`]: 起動時に登録する実行時ルール
//!
//! 起動時は翻訳器 → バインダー → ルール登録の順に構築する。

mod binder;
mod field_errors;
mod locale;
pub mod rule;
mod translator;

pub use binder::{BindError, Bindable, Binder, DEFAULT_BODY_LIMIT, REQUEST_KEY, RuleError};
pub use field_errors::FieldErrors;
pub use locale::Locale;
pub use rule::Rule;
pub use translator::{BUILTIN_KEYS, Scope, Translator, TranslatorError};
