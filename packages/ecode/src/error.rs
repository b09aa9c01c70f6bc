//! # ビジネスエラー値
//!
//! 業務エラーコードとクライアント向けメッセージを保持する不変の値型。
//!
//! ## 設計方針
//!
//! - **値型**: `with_*` 系メソッドは常に新しいインスタンスを返し、受け手を変更しない
//! - **同一性はコード**: 比較は整数コードのみで行う（メッセージや詳細は比較しない）
//! - **原因エラーはログ専用**: `cause` はシリアライズされず、`source()` からのみ参照できる
//!
//! ## 使用例
//!
//! ```
//! use respkit_ecode::{BusinessError, ErrorCode, code};
//!
//! let err = code::INVALID_PARAMS.with_details(serde_json::json!({ "name": "必須です" }));
//!
//! assert_eq!(err.code(), 1000001);
//! assert!(err.details().is_some());
//! // 共有されたデフォルト値は変更されない
//! assert!(code::INVALID_PARAMS.details().is_none());
//! ```

use std::{borrow::Cow, error::Error as StdError, sync::Arc};

use serde::Serialize;
use thiserror::Error;

/// 原因エラー（ログ専用）
type Cause = Arc<dyn StdError + Send + Sync>;

/// ビジネスエラーが備える能力の集合
///
/// レスポンスエンベロープはこのトレイトを通じてコード・メッセージ・詳細を読み出す。
pub trait BusinessError {
   /// 業務エラーコード
   fn code(&self) -> i64;

   /// クライアント向けメッセージ
   fn message(&self) -> &str;

   /// 付加情報（バリデーションエラーのフィールドマップなど）
   fn details(&self) -> Option<&serde_json::Value>;
}

/// 業務エラー
///
/// `Display` は `code: <code>, msg: <msg>` 形式で出力する。
#[derive(Debug, Clone, Error, Serialize)]
#[error("code: {code}, msg: {msg}")]
pub struct ErrorCode {
   code:    i64,
   msg:     Cow<'static, str>,
   #[serde(skip_serializing_if = "Option::is_none")]
   details: Option<serde_json::Value>,
   #[serde(skip)]
   #[source]
   cause:   Option<Cause>,
}

impl ErrorCode {
   /// 新しい業務エラーを作成する
   ///
   /// `const fn` なので、共通エラーを定数として定義できる。
   pub const fn new(code: i64, msg: &'static str) -> Self {
      Self {
         code,
         msg: Cow::Borrowed(msg),
         details: None,
         cause: None,
      }
   }

   /// 詳細を付加した新しいインスタンスを返す
   pub fn with_details(&self, details: impl Into<serde_json::Value>) -> Self {
      Self {
         details: Some(details.into()),
         ..self.clone()
      }
   }

   /// メッセージを差し替えた新しいインスタンスを返す
   pub fn with_msg(&self, msg: impl Into<Cow<'static, str>>) -> Self {
      Self {
         msg: msg.into(),
         ..self.clone()
      }
   }

   /// 原因エラーを記録した新しいインスタンスを返す
   ///
   /// 原因はクライアントには返さない。ログ出力にのみ使用する。
   pub fn with_cause(&self, cause: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
      let cause: Box<dyn StdError + Send + Sync> = cause.into();
      Self {
         cause: Some(Arc::from(cause)),
         ..self.clone()
      }
   }

   /// 原因エラーへの参照
   pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
      self.cause.as_deref()
   }
}

impl BusinessError for ErrorCode {
   fn code(&self) -> i64 {
      self.code
   }

   fn message(&self) -> &str {
      &self.msg
   }

   fn details(&self) -> Option<&serde_json::Value> {
      self.details.as_ref()
   }
}

impl PartialEq for ErrorCode {
   fn eq(&self, other: &Self) -> bool {
      self.code == other.code
   }
}

impl Eq for ErrorCode {}
