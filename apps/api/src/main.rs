//! # respkit API サーバー
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `API_LOCALE` | No | 検証メッセージの既定ロケール（デフォルト: `ja`） |
//! | `API_BODY_LIMIT` | No | ボディ上限バイト数（デフォルト: `1048576`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p respkit-api
//! LOG_FORMAT=json API_PORT=8080 cargo run -p respkit-api --release
//! ```

use std::env;

use anyhow::Context as _;
use respkit_api::{AppState, build_router, config::ApiConfig};
use respkit_shared::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. 状態（翻訳器、バインダー、ステータス上書き）の構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   let tracing_config = TracingConfig::from_lookup(|key| env::var(key).ok());
   init_tracing(&tracing_config).context("トレーシングの初期化に失敗しました")?;

   let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;
   tracing::info!(
      "API サーバーを起動します: {}:{} (locale={})",
      config.host,
      config.port,
      config.locale
   );

   let state = AppState::build(&config)?;
   tracing::debug!(
      locale = %state.binder.translator().default_locale(),
      "検証メッセージの既定ロケール"
   );
   for (code, status) in state.responder.registry().overrides() {
      tracing::debug!(code, status = status.as_u16(), "ステータス上書き");
   }

   let addr = config.addr()?;
   let listener = TcpListener::bind(addr).await?;
   tracing::info!("API サーバーが起動しました: {}", addr);

   axum::serve(listener, build_router(state)).await?;

   Ok(())
}
