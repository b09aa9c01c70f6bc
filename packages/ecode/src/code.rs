//! # 共通エラーコード
//!
//! 全サービスで共有する業務エラーコードの定義。
//!
//! ## コード体系
//!
//! | 範囲 | 意味 | 既定の HTTP ステータス |
//! |------|------|------------------------|
//! | `0` | 成功 | 200 |
//! | `1_000_000` 以上 `2_000_000` 未満 | システムエラー | 500 |
//! | `2_000_000` 以上 | 業務エラー（クライアントが JSON の code で判定） | 200 |
//!
//! ここで定義するコードの多くはシステムエラー帯に属するが、意味的には
//! クライアントエラーであるため [`default_overrides`] で個別のステータスを登録する。

use http::StatusCode;

use crate::{BusinessError, ErrorCode};

/// 成功コード
pub const SUCCESS_CODE: i64 = 0;

/// 成功
pub const SUCCESS: ErrorCode = ErrorCode::new(SUCCESS_CODE, "成功");

/// 内部エラー（範囲の規約により 500）
pub const SERVER_ERROR: ErrorCode = ErrorCode::new(1000000, "内部エラーが発生しました");

/// パラメータ不正
pub const INVALID_PARAMS: ErrorCode = ErrorCode::new(1000001, "パラメータが不正です");

/// リソースが存在しない
pub const NOT_FOUND: ErrorCode = ErrorCode::new(1000002, "リソースが見つかりません");

/// 未認証
pub const UNAUTHORIZED: ErrorCode = ErrorCode::new(1000003, "認証されていません");

/// アクセス禁止
pub const FORBIDDEN: ErrorCode = ErrorCode::new(1000004, "アクセスが禁止されています");

/// リクエスト過多
pub const TOO_MANY_REQUESTS: ErrorCode = ErrorCode::new(1000007, "リクエストが多すぎます");

/// 起動時に登録する既定のステータス上書き
pub fn default_overrides() -> [(i64, StatusCode); 6] {
   [
      (SUCCESS.code(), StatusCode::OK),
      (NOT_FOUND.code(), StatusCode::NOT_FOUND),
      (UNAUTHORIZED.code(), StatusCode::UNAUTHORIZED),
      (FORBIDDEN.code(), StatusCode::FORBIDDEN),
      (TOO_MANY_REQUESTS.code(), StatusCode::TOO_MANY_REQUESTS),
      (INVALID_PARAMS.code(), StatusCode::BAD_REQUEST),
   ]
}
