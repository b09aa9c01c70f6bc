//! # HTTP リクエストハンドラ
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - レスポンスはすべて `Responder` を通してエンベロープ形式で返す

pub mod health;
pub mod member;

pub use health::health_check;
pub use member::{CreateMemberRequest, create_member, get_member};
