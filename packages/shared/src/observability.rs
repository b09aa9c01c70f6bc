//! # Observability 基盤
//!
//! トレーシング初期化とログ出力形式の設定を提供する。
//! 環境変数 `LOG_FORMAT` による JSON / Pretty 出力の切り替えに対応する。
//!
//! 初期化は起動シーケンスの先頭で一度だけ行い、失敗した場合は起動を中止する。

use thiserror::Error;

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,respkit=debug,tower_http=debug";

/// ログ出力形式
///
/// 値が未設定または不正な場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
   /// JSON 形式（本番環境向け）
   Json,
   /// 人間が読みやすい形式（開発環境向け）
   #[default]
   Pretty,
}

impl LogFormat {
   /// 文字列からログ形式をパースする
   ///
   /// トレーシング初期化前に呼ばれるため、不正な値の警告は stderr に出力する。
   pub fn parse(s: &str) -> Self {
      match s {
         "json" => Self::Json,
         "pretty" => Self::Pretty,
         other => {
            eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
            Self::Pretty
         }
      }
   }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
   /// ログ出力形式
   pub log_format:     LogFormat,
   /// `RUST_LOG` 未設定時に使うフィルタ
   pub default_filter: String,
}

impl TracingConfig {
   /// 新しい設定を作成する
   pub fn new(log_format: LogFormat) -> Self {
      Self {
         log_format,
         default_filter: DEFAULT_FILTER.to_string(),
      }
   }

   /// 既定のフィルタを差し替える
   pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
      self.default_filter = filter.into();
      self
   }

   /// 値の取得関数から設定を読み取る
   ///
   /// `LOG_FORMAT` キーで出力形式を決定する。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
      let log_format = lookup("LOG_FORMAT")
         .map(|value| LogFormat::parse(&value))
         .unwrap_or_default();
      Self::new(log_format)
   }
}

/// トレーシング初期化エラー
#[derive(Debug, Error)]
pub enum TracingError {
   /// 既定フィルタの構文が不正
   #[error("ログフィルタが不正です: {0}")]
   InvalidFilter(#[from] tracing_subscriber::filter::ParseError),

   /// グローバルサブスクライバーが既に設定済み
   #[error("トレーシングは初期化済みです: {0}")]
   AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// トレーシングを初期化する
///
/// `RUST_LOG` 環境変数が設定されていればそれを優先し、
/// 未設定の場合は [`TracingConfig::default_filter`] を使う。
///
/// JSON モードでは `timestamp`, `level`, `target`, `message` がトップレベルに出力される。
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
   use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

   let env_filter = match EnvFilter::try_from_default_env() {
      Ok(filter) => filter,
      Err(_) => EnvFilter::try_new(&config.default_filter)?,
   };

   let fmt_layer = match config.log_format {
      LogFormat::Json => tracing_subscriber::fmt::layer()
         .json()
         .flatten_event(true)
         .with_target(true)
         .with_current_span(true)
         .with_span_list(false)
         .boxed(),
      LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
   };

   tracing_subscriber::registry()
      .with(env_filter)
      .with(fmt_layer)
      .try_init()?;

   Ok(())
}
