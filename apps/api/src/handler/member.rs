//! # 会員ハンドラ
//!
//! - `POST /members` - 会員登録（検証失敗は `INVALID_PARAMS` + フィールドごとのメッセージ）
//! - `GET /members/{id}` - 会員取得
//!
//! 会員の状態によって返す業務エラーが変わる:
//!
//! | 状態 | コード | HTTP |
//! |------|--------|------|
//! | active | 0 | 200 |
//! | frozen | `MEMBER_FROZEN` | 200（業務エラー帯） |
//! | suspended | `SESSION_EXPIRED` | 401（上書き登録） |

use std::sync::Arc;

use axum::{
   extract::{Path, State},
   response::Response,
};
use respkit_ecode::code;
use respkit_web::{ApiError, Responder, ValidJson, validation::Bindable};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
   code::{MEMBER_FROZEN, SESSION_EXPIRED},
   member::{Member, MemberDirectory, MemberStatus, NewMember},
};

/// 会員登録リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMemberRequest {
   #[validate(length(min = 1, max = 50))]
   pub name:  String,
   #[validate(range(min = 18))]
   pub age:   u8,
   #[validate(email)]
   pub email: Option<String>,
   /// `mobile` ルールで検証する
   pub phone: Option<String>,
}

impl Bindable for CreateMemberRequest {
   const RULES: &'static [(&'static str, &'static str)] = &[("phone", "mobile")];
}

/// POST /members
pub async fn create_member(
   State(members): State<Arc<MemberDirectory>>,
   responder: Responder,
   ValidJson(req): ValidJson<CreateMemberRequest>,
) -> Response {
   let member = members.insert(NewMember {
      name:  req.name,
      age:   req.age,
      email: req.email,
      phone: req.phone,
   });
   tracing::info!(member.id = member.id, "会員を登録しました");

   responder.success(member)
}

/// GET /members/{id}
pub async fn get_member(
   State(members): State<Arc<MemberDirectory>>,
   responder: Responder,
   Path(id): Path<String>,
) -> Response {
   responder.result(find_member(&members, &id))
}

fn find_member(members: &MemberDirectory, raw_id: &str) -> Result<Member, ApiError> {
   let id: u64 = raw_id.parse().map_err(|_| {
      code::INVALID_PARAMS.with_details(json!({ "id": "会員 ID は数値で指定してください" }))
   })?;

   let member = members.find(id).ok_or(code::NOT_FOUND)?;
   match member.status {
      MemberStatus::Active => Ok(member),
      MemberStatus::Frozen => Err(MEMBER_FROZEN.into()),
      MemberStatus::Suspended => Err(SESSION_EXPIRED.into()),
   }
}
