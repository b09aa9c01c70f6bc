//! # 実行時検証ルール
//!
//! 型の derive では表現できない検証（携帯電話番号の形式など）を、
//! 起動時に名前付きで登録するためのルール定義。

use std::{collections::HashMap, fmt, sync::Arc};

use serde_json::Value;

use super::Locale;

/// validator の組み込みルール名
///
/// これらの名前ではカスタムルールを登録できない。
pub const BUILTIN_RULES: &[&str] = &[
   "required",
   "length",
   "range",
   "email",
   "url",
   "regex",
   "contains",
   "does_not_contain",
   "must_match",
   "credit_card",
   "non_control_character",
   "nested",
   "custom",
];

type Predicate = dyn Fn(&Value) -> bool + Send + Sync;

/// 名前付きの検証ルール
///
/// 述語は JSON 値を受け取り、妥当であれば `true` を返す。
#[derive(Clone)]
pub struct Rule {
   name:      String,
   predicate: Arc<Predicate>,
   messages:  HashMap<Locale, String>,
}

impl Rule {
   pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
   where
      F: Fn(&Value) -> bool + Send + Sync + 'static,
   {
      Self {
         name:      name.into(),
         predicate: Arc::new(predicate),
         messages:  HashMap::new(),
      }
   }

   /// 文字列値に対するルールを作る
   ///
   /// 文字列以外の値は不正とみなす。
   pub fn for_str<F>(name: impl Into<String>, predicate: F) -> Self
   where
      F: Fn(&str) -> bool + Send + Sync + 'static,
   {
      Self::new(name, move |value| value.as_str().is_some_and(&predicate))
   }

   /// ロケールごとのメッセージテンプレートを設定する
   pub fn message(mut self, locale: Locale, template: impl Into<String>) -> Self {
      self.messages.insert(locale, template.into());
      self
   }

   pub fn name(&self) -> &str {
      &self.name
   }

   pub fn messages(&self) -> &HashMap<Locale, String> {
      &self.messages
   }

   pub fn check(&self, value: &Value) -> bool {
      (self.predicate)(value)
   }
}

impl fmt::Debug for Rule {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("Rule")
         .field("name", &self.name)
         .field("messages", &self.messages)
         .finish_non_exhaustive()
   }
}
