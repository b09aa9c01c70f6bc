//! # HTTP ステータス解決
//!
//! 業務エラーコードから HTTP ステータスを決定する。
//!
//! ## 解決順序
//!
//! 1. 成功コード `0` は常に 200（上書き対象外）
//! 2. 上書きテーブルに登録があればその値
//! 3. コード範囲の規約（[`status_from_code_range`]）
//!
//! 規約はすべての整数に対してステータスを返すため、解決は失敗しない。
//! 大半のコードは登録不要で、404/401/403/429 相当の一部のコードだけを上書き登録する。
//!
//! ## 並行性
//!
//! 上書きテーブルは起動時に書き込まれ、リクエスト処理中は並行して読み出される。
//! `DashMap` によりロックを意識せずに共有できる。

use dashmap::DashMap;
use http::StatusCode;

use crate::code;

/// 業務エラー帯の下限（この値を含む）
pub const BUSINESS_CODE_MIN: i64 = 2_000_000;

/// システムエラー帯の下限（この値を含む）
pub const SYSTEM_CODE_MIN: i64 = 1_000_000;

/// 業務エラーコード → HTTP ステータスの上書きテーブル
///
/// プロセス起動時に一度だけ構築し、`Arc` で各コンポーネントに渡す。
#[derive(Debug, Default)]
pub struct StatusRegistry {
   overrides: DashMap<i64, StatusCode>,
}

impl StatusRegistry {
   /// 空のレジストリを作成する
   pub fn new() -> Self {
      Self::default()
   }

   /// 既定の上書きを登録済みのレジストリを作成する
   pub fn with_defaults() -> Self {
      let registry = Self::new();
      registry.register_defaults();
      registry
   }

   /// 既定の上書き（404/401/403/429/400）を登録する
   pub fn register_defaults(&self) {
      for (code, status) in code::default_overrides() {
         self.register(code, status);
      }
   }

   /// 上書きを登録する
   ///
   /// 既存の登録は置き換える（後勝ち）。
   pub fn register(&self, code: i64, status: StatusCode) {
      match self.overrides.insert(code, status) {
         Some(previous) if previous != status => tracing::debug!(
            code,
            previous = previous.as_u16(),
            status = status.as_u16(),
            "ステータス上書きを置き換えました"
         ),
         _ => tracing::debug!(code, status = status.as_u16(), "ステータス上書きを登録しました"),
      }
   }

   /// 業務エラーコードに対応する HTTP ステータスを返す
   pub fn resolve(&self, code: i64) -> StatusCode {
      if code == code::SUCCESS_CODE {
         return StatusCode::OK;
      }

      if let Some(status) = self.overrides.get(&code) {
         return *status;
      }

      status_from_code_range(code)
   }

   /// 登録済みの上書きをコード順に返す
   pub fn overrides(&self) -> Vec<(i64, StatusCode)> {
      let mut entries: Vec<_> = self
         .overrides
         .iter()
         .map(|entry| (*entry.key(), *entry.value()))
         .collect();
      entries.sort_unstable_by_key(|(code, _)| *code);
      entries
   }
}

/// コード範囲の規約からステータスを推定する
///
/// - `2_000_000` 以上: 業務エラー。200 を返し、クライアントが JSON の `code` で判定する
/// - `1_000_000` 以上: システムエラー。500
/// - それ以外: 未知のコード。安全側に倒して 500
pub fn status_from_code_range(code: i64) -> StatusCode {
   if code >= BUSINESS_CODE_MIN {
      return StatusCode::OK;
   }

   if code >= SYSTEM_CODE_MIN {
      return StatusCode::INTERNAL_SERVER_ERROR;
   }

   StatusCode::INTERNAL_SERVER_ERROR
}
