//! # 会員ディレクトリ
//!
//! リファレンスサーバー用のインメモリ会員ストア。
//! 起動時にサンプル会員を投入し、リクエスト処理中は並行して読み書きする。

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::Serialize;

/// 会員の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
   Active,
   Frozen,
   Suspended,
}

/// 会員
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
   pub id:     u64,
   pub name:   String,
   pub age:    u8,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub email:  Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub phone:  Option<String>,
   pub status: MemberStatus,
}

/// 登録内容
#[derive(Debug, Clone)]
pub struct NewMember {
   pub name:  String,
   pub age:   u8,
   pub email: Option<String>,
   pub phone: Option<String>,
}

#[derive(Debug)]
pub struct MemberDirectory {
   members: DashMap<u64, Member>,
   next_id: AtomicU64,
}

impl Default for MemberDirectory {
   fn default() -> Self {
      Self {
         members: DashMap::new(),
         next_id: AtomicU64::new(1),
      }
   }
}

impl MemberDirectory {
   pub fn new() -> Self {
      Self::default()
   }

   /// サンプル会員を投入したディレクトリ
   ///
   /// | ID | 名前 | 状態 |
   /// |----|------|------|
   /// | 1 | 山田太郎 | active |
   /// | 2 | 佐藤花子 | frozen |
   /// | 3 | 鈴木一郎 | suspended |
   pub fn with_samples() -> Self {
      let directory = Self::new();
      for (name, age, status) in [
         ("山田太郎", 30, MemberStatus::Active),
         ("佐藤花子", 25, MemberStatus::Frozen),
         ("鈴木一郎", 41, MemberStatus::Suspended),
      ] {
         let member = directory.insert(NewMember {
            name: name.to_string(),
            age,
            email: None,
            phone: None,
         });
         directory.set_status(member.id, status);
      }
      directory
   }

   /// 会員を登録し、採番した会員を返す
   pub fn insert(&self, new_member: NewMember) -> Member {
      let id = self.next_id.fetch_add(1, Ordering::Relaxed);
      let member = Member {
         id,
         name: new_member.name,
         age: new_member.age,
         email: new_member.email,
         phone: new_member.phone,
         status: MemberStatus::Active,
      };
      self.members.insert(id, member.clone());
      member
   }

   pub fn find(&self, id: u64) -> Option<Member> {
      self.members.get(&id).map(|member| member.value().clone())
   }

   fn set_status(&self, id: u64, status: MemberStatus) {
      if let Some(mut member) = self.members.get_mut(&id) {
         member.status = status;
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_insertで連番のidを採番する() {
      let sut = MemberDirectory::new();

      let first = sut.insert(NewMember {
         name:  "a".to_string(),
         age:   20,
         email: None,
         phone: None,
      });
      let second = sut.insert(NewMember {
         name:  "b".to_string(),
         age:   21,
         email: Some("b@example.com".to_string()),
         phone: None,
      });

      assert_eq!((first.id, second.id), (1, 2));
      assert_eq!(sut.find(2), Some(second));
      assert_eq!(sut.find(3), None);
   }

   #[test]
   fn test_サンプル会員は状態ごとに1件ずつ存在する() {
      let sut = MemberDirectory::with_samples();

      let statuses: Vec<_> = (1..=3)
         .filter_map(|id| sut.find(id))
         .map(|member| member.status)
         .collect();

      assert_eq!(
         statuses,
         vec![
            MemberStatus::Active,
            MemberStatus::Frozen,
            MemberStatus::Suspended
         ]
      );
   }
}
