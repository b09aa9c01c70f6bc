//! # respkit リファレンスサーバー
//!
//! エラーコード規約、統一レスポンス形式、リクエスト検証を組み合わせた最小構成の API サーバー。
//!
//! ## 起動シーケンス
//!
//! ```text
//! ApiConfig ─▶ Translator::new ─▶ Binder::new ─▶ register_rules
//!                                                     │
//! StatusRegistry::with_defaults ─▶ register_overrides ─┴─▶ AppState ─▶ build_router
//! ```
//!
//! グローバルな状態は持たず、すべて [`AppState`] 経由でハンドラに渡す。
//!
//! ## モジュール構成
//!
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`code`] - 会員ドメインの業務エラーコード
//! - [`rules`] - 実行時検証ルール
//! - [`member`] - インメモリ会員ディレクトリ
//! - [`handler`] - HTTP リクエストハンドラ

pub mod code;
pub mod config;
pub mod handler;
pub mod member;
pub mod rules;

use std::sync::Arc;

use anyhow::Context as _;
use axum::{
   Router,
   extract::FromRef,
   routing::{get, post},
};
use config::ApiConfig;
use handler::{create_member, get_member, health_check};
use member::MemberDirectory;
use respkit_ecode::StatusRegistry;
use respkit_web::{
   Responder,
   validation::{Binder, Translator},
};
use tower_http::trace::TraceLayer;

/// ハンドラ間で共有する状態
#[derive(Debug, Clone)]
pub struct AppState {
   pub binder:    Arc<Binder>,
   pub responder: Responder,
   pub members:   Arc<MemberDirectory>,
}

impl AppState {
   /// 設定から状態を構築する
   ///
   /// 翻訳器の検証やルール登録に失敗した場合は起動を中止する。
   pub fn build(config: &ApiConfig) -> anyhow::Result<Self> {
      let translator =
         Translator::new(config.locale).context("翻訳器の初期化に失敗しました")?;
      let binder = Binder::new(translator).with_body_limit(config.body_limit);
      rules::register_rules(&binder).context("検証ルールの登録に失敗しました")?;

      let registry = StatusRegistry::with_defaults();
      code::register_overrides(&registry);

      Ok(Self {
         binder:    Arc::new(binder),
         responder: Responder::new(Arc::new(registry)),
         members:   Arc::new(MemberDirectory::with_samples()),
      })
   }
}

impl FromRef<AppState> for Arc<Binder> {
   fn from_ref(state: &AppState) -> Self {
      Arc::clone(&state.binder)
   }
}

impl FromRef<AppState> for Responder {
   fn from_ref(state: &AppState) -> Self {
      state.responder.clone()
   }
}

impl FromRef<AppState> for Arc<MemberDirectory> {
   fn from_ref(state: &AppState) -> Self {
      Arc::clone(&state.members)
   }
}

/// ルーターを構築する
///
/// `TraceLayer` により、すべての HTTP リクエストがトレーシングされる。
pub fn build_router(state: AppState) -> Router {
   Router::new()
      .route("/health", get(health_check))
      .route("/members", post(create_member))
      .route("/members/{id}", get(get_member))
      .with_state(state)
      .layer(TraceLayer::new_for_http())
}
