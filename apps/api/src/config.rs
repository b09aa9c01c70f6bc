//! # アプリケーション設定
//!
//! 環境変数からリファレンスサーバーの設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `API_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `API_PORT` | No | `3000` | ポート番号 |
//! | `API_LOCALE` | No | `ja` | 検証メッセージの既定ロケール |
//! | `API_BODY_LIMIT` | No | `1048576` | バインド時に読み込むボディの上限（バイト） |
//!
//! ログ出力形式（`LOG_FORMAT`）は `respkit_shared::TracingConfig` が読み込む。

use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use respkit_web::validation::{DEFAULT_BODY_LIMIT, Locale};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// 設定の読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
   #[error("{key} の値 {value:?} が不正です: {reason}")]
   InvalidValue {
      key:    &'static str,
      value:  String,
      reason: String,
   },

   #[error("未対応のロケールです: {0}")]
   UnsupportedLocale(String),

   #[error("バインドアドレス {0:?} が不正です")]
   InvalidAddress(String),
}

/// リファレンスサーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
   /// バインドアドレス
   pub host:       String,
   /// ポート番号
   pub port:       u16,
   /// 検証メッセージの既定ロケール
   pub locale:     Locale,
   /// バインド時に読み込むボディの上限（バイト）
   pub body_limit: usize,
}

impl ApiConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|key| env::var(key).ok())
   }

   /// 値の取得関数から設定を読み込む
   ///
   /// 未設定の値はデフォルトを使い、解釈できない値はエラーにする。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let locale = match lookup("API_LOCALE") {
         Some(tag) => tag
            .parse()
            .map_err(|_| ConfigError::UnsupportedLocale(tag))?,
         None => Locale::default(),
      };

      Ok(Self {
         host: lookup("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
         port: parse_or("API_PORT", lookup("API_PORT"), DEFAULT_PORT)?,
         locale,
         body_limit: parse_or("API_BODY_LIMIT", lookup("API_BODY_LIMIT"), DEFAULT_BODY_LIMIT)?,
      })
   }

   /// バインドするソケットアドレス
   pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
      let addr = format!("{}:{}", self.host, self.port);
      addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
   }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
   T: FromStr,
   T::Err: Display,
{
   let Some(value) = value else {
      return Ok(default);
   };

   value
      .trim()
      .parse()
      .map_err(|err: T::Err| ConfigError::InvalidValue {
         key,
         reason: err.to_string(),
         value,
      })
}
