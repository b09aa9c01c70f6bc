//! # ヘルスチェックハンドラ
//!
//! ```text
//! GET /health
//! ```
//!
//! ```json
//! { "code": 0, "msg": "成功", "data": { "status": "healthy", "version": "0.1.0" } }
//! ```

use axum::response::Response;
use respkit_web::Responder;
use serde::Serialize;

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
   /// 稼働状態
   pub status:  String,
   /// アプリケーションバージョン（Cargo.toml から取得）
   pub version: String,
}

/// ヘルスチェックエンドポイント
///
/// アプリケーション自体の起動状態のみを返す。
pub async fn health_check(responder: Responder) -> Response {
   responder.success(HealthResponse {
      status:  "healthy".to_string(),
      version: env!("CARGO_PKG_VERSION").to_string(),
   })
}
