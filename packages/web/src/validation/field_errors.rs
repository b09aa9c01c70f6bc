use std::collections::{HashMap, hash_map};

use serde::{Deserialize, Serialize};

/// フィールド名 → エラーメッセージの対応
///
/// 1 フィールドにつき 1 メッセージ。最初に記録したメッセージを残す。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
   pub fn new() -> Self {
      Self::default()
   }

   /// メッセージを記録する
   ///
   /// 既に記録済みのフィールドは上書きしない。記録した場合は `true` を返す。
   pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) -> bool {
      match self.0.entry(field.into()) {
         hash_map::Entry::Occupied(_) => false,
         hash_map::Entry::Vacant(entry) => {
            entry.insert(message.into());
            true
         }
      }
   }

   pub fn get(&self, field: &str) -> Option<&str> {
      self.0.get(field).map(String::as_str)
   }

   pub fn contains_key(&self, field: &str) -> bool {
      self.0.contains_key(field)
   }

   pub fn len(&self) -> usize {
      self.0.len()
   }

   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }

   pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
      self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
   }
}

impl From<FieldErrors> for serde_json::Value {
   fn from(errors: FieldErrors) -> Self {
      serde_json::Value::Object(
         errors
            .0
            .into_iter()
            .map(|(field, message)| (field, serde_json::Value::String(message)))
            .collect(),
      )
   }
}
