//! # メッセージ翻訳
//!
//! 検証ルール名（メッセージキー）とロケールからメッセージテンプレートを引き、
//! フィールド名とルールのパラメータを埋め込んで返す。
//!
//! テンプレートのプレースホルダ:
//!
//! - `{field}`: ワイヤー上のフィールド名
//! - `{min}`, `{max}`, `{equal}` など: ルールのパラメータ
//!
//! 組み込みテンプレートは静的に持ち、カスタムルールのテンプレートは起動時に追加する。

use std::collections::HashMap;

use dashmap::DashMap;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::Locale;

/// 組み込みメッセージキー
pub const BUILTIN_KEYS: &[&str] = &[
   "required",
   "length.min",
   "length.max",
   "length.between",
   "length.equal",
   "range.min",
   "range.max",
   "range.between",
   "range.gt",
   "range.lt",
   "email",
   "url",
   "regex",
   "contains",
   "does_not_contain",
   "must_match",
   "credit_card",
   "non_control_character",
   "type_mismatch",
   "malformed",
   "default",
];

const JA: &[(&str, &str)] = &[
   ("required", "{field}は必須項目です"),
   ("length.min", "{field}は{min}文字以上で入力してください"),
   ("length.max", "{field}は{max}文字以内で入力してください"),
   ("length.between", "{field}は{min}〜{max}文字で入力してください"),
   ("length.equal", "{field}は{equal}文字で入力してください"),
   ("range.min", "{field}は{min}以上である必要があります"),
   ("range.max", "{field}は{max}以下である必要があります"),
   ("range.between", "{field}は{min}以上{max}以下である必要があります"),
   ("range.gt", "{field}は{exclusive_min}より大きい必要があります"),
   ("range.lt", "{field}は{exclusive_max}より小さい必要があります"),
   ("email", "{field}は正しいメールアドレスではありません"),
   ("url", "{field}は正しいURLではありません"),
   ("regex", "{field}の形式が正しくありません"),
   ("contains", "{field}に必要な文字列が含まれていません"),
   ("does_not_contain", "{field}に使用できない文字列が含まれています"),
   ("must_match", "{field}が確認用の値と一致しません"),
   ("credit_card", "{field}は正しいクレジットカード番号ではありません"),
   ("non_control_character", "{field}に制御文字は使用できません"),
   ("type_mismatch", "データ型が正しくありません"),
   ("malformed", "リクエストの形式が正しくありません"),
   ("default", "{field}の値が正しくありません"),
];

const EN: &[(&str, &str)] = &[
   ("required", "{field} is a required field"),
   ("length.min", "{field} must be at least {min} characters"),
   ("length.max", "{field} must be at most {max} characters"),
   ("length.between", "{field} must be between {min} and {max} characters"),
   ("length.equal", "{field} must be exactly {equal} characters"),
   ("range.min", "{field} must be {min} or greater"),
   ("range.max", "{field} must be {max} or less"),
   ("range.between", "{field} must be between {min} and {max}"),
   ("range.gt", "{field} must be greater than {exclusive_min}"),
   ("range.lt", "{field} must be less than {exclusive_max}"),
   ("email", "{field} must be a valid email address"),
   ("url", "{field} must be a valid URL"),
   ("regex", "{field} has an invalid format"),
   ("contains", "{field} does not contain the required text"),
   ("does_not_contain", "{field} contains forbidden text"),
   ("must_match", "{field} does not match its confirmation"),
   ("credit_card", "{field} must be a valid credit card number"),
   ("non_control_character", "{field} must not contain control characters"),
   ("type_mismatch", "wrong data type"),
   ("malformed", "malformed request"),
   ("default", "{field} is invalid"),
];

fn catalog(locale: Locale) -> &'static [(&'static str, &'static str)] {
   match locale {
      Locale::Ja => JA,
      Locale::En => EN,
   }
}

fn builtin(locale: Locale, key: &str) -> Option<&'static str> {
   catalog(locale)
      .iter()
      .find(|(k, _)| *k == key)
      .map(|(_, template)| *template)
}

/// 翻訳器の初期化エラー
#[derive(Debug, Error)]
pub enum TranslatorError {
   #[error("未対応のロケールです: {0}")]
   UnsupportedLocale(String),

   #[error("ロケール {locale} にメッセージ {key} のテンプレートがありません")]
   MissingTemplate { locale: Locale, key: &'static str },
}

/// メッセージ翻訳器
#[derive(Debug)]
pub struct Translator {
   default_locale: Locale,
   custom:         DashMap<String, HashMap<Locale, String>>,
}

impl Translator {
   /// 翻訳器を作成する
   ///
   /// すべてのロケールが組み込みキーを網羅しているかを検証し、欠けていればエラーを返す。
   pub fn new(default_locale: Locale) -> Result<Self, TranslatorError> {
      for locale in Locale::iter() {
         for &key in BUILTIN_KEYS {
            if builtin(locale, key).is_none() {
               return Err(TranslatorError::MissingTemplate { locale, key });
            }
         }
      }

      Ok(Self {
         default_locale,
         custom: DashMap::new(),
      })
   }

   /// 言語タグ（`ja`, `en` など）から翻訳器を作成する
   pub fn from_tag(tag: &str) -> Result<Self, TranslatorError> {
      let locale = tag
         .parse()
         .map_err(|_| TranslatorError::UnsupportedLocale(tag.to_string()))?;
      Self::new(locale)
   }

   pub fn default_locale(&self) -> Locale {
      self.default_locale
   }

   /// 組み込みのメッセージキーかどうか
   pub fn is_builtin(key: &str) -> bool {
      BUILTIN_KEYS.contains(&key)
   }

   /// カスタムルールのテンプレートを登録する
   ///
   /// 組み込みキーの保護や既定ロケールの有無は呼び出し側（`Binder`）で検証済みとする。
   pub(crate) fn insert_templates(&self, key: &str, templates: HashMap<Locale, String>) {
      self.custom.insert(key.to_string(), templates);
   }

   /// 翻訳スコープを作る
   ///
   /// 1 回の検証失敗につき 1 度だけ呼び、全フィールドのメッセージを同じロケールで描画する。
   pub fn scope(&self, locale: Option<Locale>) -> Scope<'_> {
      Scope {
         translator: self,
         locale:     locale.unwrap_or(self.default_locale),
      }
   }

   fn template(&self, locale: Locale, key: &str) -> String {
      if let Some(template) = builtin(locale, key) {
         return template.to_string();
      }

      let custom = self.custom.get(key).and_then(|templates| {
         templates
            .get(&locale)
            .or_else(|| templates.get(&self.default_locale))
            .cloned()
      });
      if let Some(template) = custom {
         return template;
      }

      builtin(locale, "default")
         .unwrap_or("{field}")
         .to_string()
   }
}

/// ロケールを固定した翻訳スコープ
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
   translator: &'a Translator,
   locale:     Locale,
}

impl Scope<'_> {
   pub fn locale(&self) -> Locale {
      self.locale
   }

   /// メッセージを描画する
   ///
   /// 未知のキーは `default` テンプレートで描画する。
   pub fn render(&self, key: &str, field: &str, params: &[(&str, String)]) -> String {
      let mut message = self
         .translator
         .template(self.locale, key)
         .replace("{field}", field);
      for (name, value) in params {
         message = message.replace(&format!("{{{name}}}"), value);
      }
      message
   }
}
