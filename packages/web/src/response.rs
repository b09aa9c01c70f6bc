//! # レスポンスエンベロープ
//!
//! すべての API レスポンスを `{ "code": <int>, "msg": <string>, "data": <any> }` 形式で返す。
//!
//! ## 設計
//!
//! - 成功時は常に HTTP 200、`code = 0`
//! - 業務エラーは [`StatusRegistry`] でステータスを解決し、`data` に詳細を載せる
//! - それ以外のエラー（内部エラー）は常に 500 + 共通の内部エラーコードで返し、
//!   原因はログにのみ出力する
//! - [`Responder`] のメソッドは `self` を消費するため、1 リクエストにつき 1 回しか応答できない
//!
//! ## エラーの流れ
//!
//! ```text
//! ハンドラ
//!   ├─ Ok(T)                  → Responder::success   → 200 {code:0, msg, data}
//!   ├─ Err(ErrorCode)         → Responder::failure   → registry.resolve(code) {code, msg, data?}
//!   └─ Err(anyhow::Error)     → Responder::failure   → 500 {code: SERVER_ERROR, msg}
//! ```

use std::{convert::Infallible, sync::Arc};

use axum::{
   Json,
   extract::{FromRef, FromRequestParts},
   http::{StatusCode, request::Parts},
   response::{IntoResponse, Response},
};
use respkit_ecode::{BusinessError, ErrorCode, StatusRegistry, code};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 統一レスポンス形式
///
/// `data` が `None` の場合はフィールド自体を出力しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
   pub code: i64,
   pub msg:  String,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub data: Option<T>,
}

impl<T> Envelope<T> {
   /// データ付きの成功レスポンス
   pub fn success(data: T) -> Self {
      Self {
         code: code::SUCCESS.code(),
         msg:  code::SUCCESS.message().to_string(),
         data: Some(data),
      }
   }

   /// メッセージのみの成功レスポンス
   pub fn message(msg: impl Into<String>) -> Self {
      Self {
         code: code::SUCCESS.code(),
         msg:  msg.into(),
         data: None,
      }
   }
}

impl Envelope {
   /// 業務エラーからレスポンスを組み立てる
   pub fn from_business<E>(err: &E) -> Self
   where
      E: BusinessError + ?Sized,
   {
      Self {
         code: err.code(),
         msg:  err.message().to_string(),
         data: err.details().cloned(),
      }
   }
}

/// ハンドラが返すエラー
///
/// 業務エラーかどうかは [`ApiError::as_business`] で明示的に判定する。
#[derive(Debug, Error)]
pub enum ApiError {
   /// 構造化された業務エラー
   #[error(transparent)]
   Business(#[from] ErrorCode),

   /// 構造を持たない内部エラー
   ///
   /// 内容はクライアントに返さず、ログにのみ出力する。
   #[error("内部エラー: {0:#}")]
   Internal(anyhow::Error),
}

impl ApiError {
   /// 任意のエラーを内部エラーとして包む
   ///
   /// 業務エラーを包んだ `anyhow::Error` は業務エラーとして扱う。
   pub fn internal(err: impl Into<anyhow::Error>) -> Self {
      let err: anyhow::Error = err.into();
      Self::from(err)
   }

   /// 業務エラーであればその参照を返す
   pub fn as_business(&self) -> Option<&ErrorCode> {
      match self {
         Self::Business(err) => Some(err),
         Self::Internal(_) => None,
      }
   }

   /// 業務エラーかどうか
   pub fn is_business(&self) -> bool {
      self.as_business().is_some()
   }
}

impl From<anyhow::Error> for ApiError {
   fn from(err: anyhow::Error) -> Self {
      match err.downcast::<ErrorCode>() {
         Ok(business) => Self::Business(business),
         Err(err) => Self::Internal(err),
      }
   }
}

/// エラーから HTTP ステータスとレスポンスボディを決定する
pub fn resolve_failure(registry: &StatusRegistry, err: &ApiError) -> (StatusCode, Envelope) {
   match err.as_business() {
      Some(business) => (
         registry.resolve(business.code()),
         Envelope::from_business(business),
      ),
      None => (
         StatusCode::INTERNAL_SERVER_ERROR,
         Envelope::from_business(&code::SERVER_ERROR),
      ),
   }
}

/// レスポンス生成器
///
/// ステータスの上書きテーブルを共有し、ハンドラの結果をエンベロープに変換する。
/// axum の State から [`FromRef`] で取り出せる。
#[derive(Debug, Clone)]
pub struct Responder {
   registry: Arc<StatusRegistry>,
}

impl Responder {
   pub fn new(registry: Arc<StatusRegistry>) -> Self {
      Self { registry }
   }

   pub fn registry(&self) -> &StatusRegistry {
      &self.registry
   }

   /// 成功レスポンス（データ付き）
   pub fn success<T: Serialize>(self, data: T) -> Response {
      (StatusCode::OK, Json(Envelope::success(data))).into_response()
   }

   /// 成功レスポンス（メッセージのみ）
   pub fn success_msg(self, msg: impl Into<String>) -> Response {
      (StatusCode::OK, Json(Envelope::<()>::message(msg))).into_response()
   }

   /// 失敗レスポンス
   pub fn failure(self, err: impl Into<ApiError>) -> Response {
      let err = err.into();
      let (status, envelope) = resolve_failure(&self.registry, &err);
      log_failure(status, &err);
      (status, Json(envelope)).into_response()
   }

   /// `Result` を成功・失敗のどちらかのレスポンスに変換する
   pub fn result<T: Serialize>(self, result: Result<T, ApiError>) -> Response {
      match result {
         Ok(data) => self.success(data),
         Err(err) => self.failure(err),
      }
   }
}

impl<S> FromRequestParts<S> for Responder
where
   Responder: FromRef<S>,
   S: Send + Sync,
{
   type Rejection = Infallible;

   async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
      Ok(Self::from_ref(state))
   }
}

fn log_failure(status: StatusCode, err: &ApiError) {
   match err {
      ApiError::Internal(e) => {
         tracing::error!(
            error.category = "internal",
            error = ?e,
            "内部エラーが発生しました"
         );
      }
      ApiError::Business(e) if status.is_server_error() => {
         tracing::error!(
            error.category = "business",
            code = e.code(),
            status = status.as_u16(),
            cause = ?e.cause(),
            "サーバーエラーとして業務エラーを返します: {}",
            e.message()
         );
      }
      ApiError::Business(e) => {
         if let Some(cause) = e.cause() {
            tracing::debug!(code = e.code(), cause = %cause, "業務エラーの原因");
         }
      }
   }
}
