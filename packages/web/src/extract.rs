//! # 検証付き JSON エクストラクタ
//!
//! ハンドラの引数に [`ValidJson<T>`] を書くと、ボディのバインドと検証を済ませた値を受け取れる。
//! 検証に失敗した場合はハンドラを呼ばず、`INVALID_PARAMS` のエンベロープ（400）を返す。

use std::sync::Arc;

use axum::{
   extract::{FromRef, FromRequest, Request},
   response::Response,
};

use crate::{
   response::Responder,
   validation::{Bindable, Binder},
};

/// バインドと検証を済ませた JSON ボディ
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
   T: Bindable + Send,
   Arc<Binder>: FromRef<S>,
   Responder: FromRef<S>,
   S: Send + Sync,
{
   type Rejection = Response;

   async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
      let binder = Arc::<Binder>::from_ref(state);
      match binder.bind_request::<T>(req).await {
         Ok(value) => Ok(Self(value)),
         Err(err) => Err(Responder::from_ref(state).failure(err)),
      }
   }
}
