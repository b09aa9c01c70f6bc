//! # 会員ドメインの業務エラーコード
//!
//! 業務エラー帯（`2_000_000` 以上）は既定で 200 を返すため、
//! HTTP ステータスで区別したいコードだけを [`register_overrides`] で登録する。

use axum::http::StatusCode;
use respkit_ecode::{BusinessError, ErrorCode, StatusRegistry};

/// 会員が凍結されている（業務エラー帯のまま 200）
pub const MEMBER_FROZEN: ErrorCode = ErrorCode::new(2001001, "会員は凍結されています");

/// セッションの有効期限切れ（401 に上書き）
pub const SESSION_EXPIRED: ErrorCode =
   ErrorCode::new(2001004, "セッションの有効期限が切れています");

/// 会員ドメインのステータス上書きを登録する
pub fn register_overrides(registry: &StatusRegistry) {
   registry.register(SESSION_EXPIRED.code(), StatusCode::UNAUTHORIZED);
}
