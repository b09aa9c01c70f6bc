//! # リクエストのバインドと検証
//!
//! JSON ボディを型付きの構造体に変換し、検証ルールを適用する。
//! 失敗はすべてフィールド名 → メッセージの対応（[`FieldErrors`]）にまとめる。
//!
//! ## 失敗の分類
//!
//! | 分類 | キー | メッセージ |
//! |------|------|-----------|
//! | ルール違反（derive ルール、実行時ルール、必須フィールドの欠落） | ワイヤー上のフィールド名 | ルールごとの翻訳メッセージ |
//! | 型の不一致 | フィールドのパス（`items[0].qty` など） | `type_mismatch` |
//! | 形式不正（JSON でない、ルートの型が違う、ボディが読めない） | `request` | `malformed` |
//!
//! 欠落や型の不一致があっても、そのフィールドを仮の値で埋めて変換を続ける。
//! 残りのフィールドの derive ルールと実行時ルールも評価し、1 回の失敗にすべて載せる。
//!
//! ロケールは失敗 1 回につき 1 度だけ決め、全フィールドを同じスコープで翻訳する。

use std::collections::HashMap;

use axum::{
   extract::Request,
   http::{HeaderMap, header},
};
use dashmap::DashMap;
use respkit_ecode::code;
use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde_json::Value;
use serde_path_to_error::{Path, Segment};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use super::{FieldErrors, Locale, Rule, Scope, Translator, rule::BUILTIN_RULES};
use crate::response::ApiError;

/// 形式不正の失敗を記録するキー
pub const REQUEST_KEY: &str = "request";

/// バインド時に読み込むボディの上限（バイト）
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// 仮の値で埋め直す回数の上限
const MAX_REPAIRS: usize = 64;

/// バインド対象の型
///
/// `validator::Validate` の derive ルールに加えて、実行時ルールの適用先を宣言する。
///
/// ルール違反のキーは serde の `rename` / `rename_all` から自動で決まる。
/// Rust のフィールド名から推測できない名前（`phone_number` → `tel` など）だけ
/// `WIRE_NAMES` に書く。
///
/// ```
/// use respkit_web::validation::Bindable;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// #[serde(rename_all = "camelCase")]
/// struct SignUp {
///    #[validate(length(min = 1))]
///    display_name: String,
///    #[serde(rename = "tel")]
///    #[validate(length(min = 10))]
///    phone_number: Option<String>,
/// }
///
/// impl Bindable for SignUp {
///    const WIRE_NAMES: &'static [(&'static str, &'static str)] = &[("phone_number", "tel")];
///    const RULES: &'static [(&'static str, &'static str)] = &[("tel", "mobile")];
/// }
/// ```
pub trait Bindable: DeserializeOwned + Validate {
   /// 構造体のフィールド名 → ワイヤー上の名前（自動で決まらないものだけ）
   const WIRE_NAMES: &'static [(&'static str, &'static str)] = &[];

   /// (ワイヤー上のフィールド名, 実行時ルール名)
   const RULES: &'static [(&'static str, &'static str)] = &[];
}

/// ルール登録エラー
#[derive(Debug, Error)]
pub enum RuleError {
   #[error("組み込みのルール名は使用できません: {0}")]
   Reserved(String),

   #[error("ルール {rule} に既定ロケール {locale} のメッセージがありません")]
   MissingMessage { rule: String, locale: Locale },
}

/// バインドエラー
#[derive(Debug, Error)]
pub enum BindError {
   /// 入力が不正（クライアント起因）
   #[error("リクエストの検証に失敗しました（{} 件）", .0.len())]
   Invalid(FieldErrors),

   /// 型が参照する実行時ルールが登録されていない（サーバー起因）
   #[error("検証ルールが登録されていません: {0}")]
   UnknownRule(String),
}

impl From<BindError> for ApiError {
   fn from(err: BindError) -> Self {
      match err {
         BindError::Invalid(errors) => Self::Business(code::INVALID_PARAMS.with_details(errors)),
         err @ BindError::UnknownRule(_) => Self::Internal(err.into()),
      }
   }
}

/// リクエストのバインダー
///
/// 翻訳器と実行時ルールを保持する。起動時に作成して `Arc` で共有する。
#[derive(Debug)]
pub struct Binder {
   translator: Translator,
   rules:      DashMap<String, Rule>,
   body_limit: usize,
}

impl Binder {
   pub fn new(translator: Translator) -> Self {
      Self {
         translator,
         rules: DashMap::new(),
         body_limit: DEFAULT_BODY_LIMIT,
      }
   }

   pub fn with_body_limit(mut self, body_limit: usize) -> Self {
      self.body_limit = body_limit;
      self
   }

   pub fn translator(&self) -> &Translator {
      &self.translator
   }

   /// 実行時ルールを登録する
   ///
   /// 同じ名前のカスタムルールは置き換える（後勝ち）。
   pub fn register_rule(&self, rule: Rule) -> Result<(), RuleError> {
      let name = rule.name().to_string();
      if is_reserved(&name) {
         return Err(RuleError::Reserved(name));
      }

      let default_locale = self.translator.default_locale();
      if !rule.messages().contains_key(&default_locale) {
         return Err(RuleError::MissingMessage {
            rule:   name,
            locale: default_locale,
         });
      }

      self
         .translator
         .insert_templates(&name, rule.messages().clone());
      if self.rules.insert(name.clone(), rule).is_some() {
         tracing::warn!(rule = %name, "検証ルールを置き換えました");
      } else {
         tracing::debug!(rule = %name, "検証ルールを登録しました");
      }

      Ok(())
   }

   /// リクエスト全体をバインドする
   ///
   /// `Accept-Language` からロケールを決め、JSON でないリクエストは形式不正とする。
   pub async fn bind_request<T: Bindable>(&self, request: Request) -> Result<T, BindError> {
      let (parts, body) = request.into_parts();
      let scope = self.translator.scope(negotiated_locale(&parts.headers));

      if !has_json_content_type(&parts.headers) {
         tracing::debug!("JSON 以外の Content-Type のため形式不正として扱います");
         return Err(malformed(&scope));
      }

      let bytes = match axum::body::to_bytes(body, self.body_limit).await {
         Ok(bytes) => bytes,
         Err(err) => {
            tracing::debug!(error = %err, "リクエストボディを読み込めませんでした");
            return Err(malformed(&scope));
         }
      };

      self.bind_json(&bytes, Some(scope.locale()))
   }

   /// JSON バイト列をバインドする
   pub fn bind_json<T: Bindable>(&self, bytes: &[u8], locale: Option<Locale>) -> Result<T, BindError> {
      let scope = self.translator.scope(locale);
      let value: Value = match serde_json::from_slice(bytes) {
         Ok(value) => value,
         Err(err) => {
            tracing::debug!(error = %err, "JSON として解析できませんでした");
            return Err(malformed(&scope));
         }
      };

      let mut errors = FieldErrors::new();
      let decoded = decode::<T>(&value, &scope, &mut errors)?;

      if let Err(violations) = decoded.target.validate() {
         let names = WireNames::new(T::WIRE_NAMES, declared_fields::<T>(), Some(&decoded.working));
         let mut found = FieldErrors::new();
         collect_violations(
            &violations,
            "",
            Some(&decoded.working),
            &names,
            &scope,
            &mut found,
         );
         // 仮の値の中身に対する違反は報告しない
         for (field, message) in found.iter() {
            if !decoded.fills_parent_of(field) {
               errors.insert(field, message);
            }
         }
      }
      self.apply_rules::<T>(&value, &scope, &mut errors)?;

      if errors.is_empty() {
         Ok(decoded.target)
      } else {
         tracing::debug!(count = errors.len(), locale = %scope.locale(), "検証に失敗しました");
         Err(BindError::Invalid(errors))
      }
   }

   fn apply_rules<T: Bindable>(
      &self,
      value: &Value,
      scope: &Scope<'_>,
      errors: &mut FieldErrors,
   ) -> Result<(), BindError> {
      for &(field, rule_name) in T::RULES {
         let Some(rule) = self.rules.get(rule_name) else {
            return Err(BindError::UnknownRule(rule_name.to_string()));
         };

         if errors.contains_key(field) {
            continue;
         }

         // 存在チェックは required の責務
         let Some(target) = value.get(field).filter(|target| !target.is_null()) else {
            continue;
         };

         if !rule.check(target) {
            errors.insert(field, scope.render(rule_name, field, &[]));
         }
      }
      Ok(())
   }
}

/// 仮の値を埋めながらデシリアライズした結果
struct Decoded<T> {
   target:  T,
   /// 仮の値を埋めた後の JSON
   working: Value,
   /// 仮の値を埋めたパス → 試した候補の番号
   filled:  HashMap<String, usize>,
}

impl<T> Decoded<T> {
   fn fills_parent_of(&self, field: &str) -> bool {
      is_below_filled(field, &self.filled)
   }
}

/// 欠落と型の不一致を記録し、そのフィールドを仮の値で埋めて変換をやり直す
///
/// 仮の値の候補を使い切った場合は、それまでの失敗だけを返す。
fn decode<T: DeserializeOwned>(
   value: &Value,
   scope: &Scope<'_>,
   errors: &mut FieldErrors,
) -> Result<Decoded<T>, BindError> {
   let mut working = value.clone();
   let mut filled: HashMap<String, usize> = HashMap::new();

   for _ in 0..MAX_REPAIRS {
      let result: Result<T, _> = serde_path_to_error::deserialize(&working);
      let err = match result {
         Ok(target) => {
            return Ok(Decoded {
               target,
               working,
               filled,
            });
         }
         Err(err) => err,
      };
      let path = err.path().to_string();
      let is_root = path == ".";
      let inner = err.inner().to_string();

      if let Some(missing) = missing_field_name(&inner) {
         let field = if is_root {
            missing.to_string()
         } else {
            format!("{path}.{missing}")
         };
         if !is_below_filled(&field, &filled) {
            errors.insert(field.clone(), scope.render("required", &field, &[]));
         }

         let Some(object) = value_at_mut(&mut working, err.path()).and_then(Value::as_object_mut)
         else {
            break;
         };
         object.insert(missing.to_string(), placeholder(0).unwrap_or_default());
         filled.insert(field, 0);
         continue;
      }

      if is_root {
         tracing::debug!(error = %inner, "ルートの型が一致しません");
         return Err(malformed(scope));
      }

      let attempt = match filled.get(&path) {
         Some(previous) => previous + 1,
         None => {
            tracing::debug!(path = %path, error = %inner, "フィールドの型が一致しません");
            if !is_below_filled(&path, &filled) {
               errors.insert(path.clone(), scope.render("type_mismatch", &path, &[]));
            }
            0
         }
      };

      let (Some(slot), Some(next)) = (value_at_mut(&mut working, err.path()), placeholder(attempt))
      else {
         break;
      };
      *slot = next;
      filled.insert(path, attempt);
   }

   tracing::debug!("仮の値で埋められないため変換を打ち切ります");
   if errors.is_empty() {
      Err(malformed(scope))
   } else {
      Err(BindError::Invalid(std::mem::take(errors)))
   }
}

/// 欠落・型不一致のフィールドに順に試す仮の値
fn placeholder(attempt: usize) -> Option<Value> {
   match attempt {
      0 => Some(Value::String(String::new())),
      1 => Some(Value::from(0)),
      2 => Some(Value::Bool(false)),
      3 => Some(Value::Array(Vec::new())),
      4 => Some(Value::Object(serde_json::Map::new())),
      _ => None,
   }
}

fn value_at_mut<'a>(root: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
   path.iter().try_fold(root, |current, segment| match segment {
      Segment::Seq { index } => current.get_mut(*index),
      Segment::Map { key } => current.get_mut(key.as_str()),
      _ => None,
   })
}

/// `field` が仮の値で埋めたパスの内側かどうか
fn is_below_filled(field: &str, filled: &HashMap<String, usize>) -> bool {
   filled.keys().any(|parent| {
      field
         .strip_prefix(parent.as_str())
         .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
   })
}

fn malformed(scope: &Scope<'_>) -> BindError {
   let mut errors = FieldErrors::new();
   errors.insert(REQUEST_KEY, scope.render("malformed", REQUEST_KEY, &[]));
   BindError::Invalid(errors)
}

fn is_reserved(name: &str) -> bool {
   name.is_empty() || BUILTIN_RULES.contains(&name) || Translator::is_builtin(name)
}

fn negotiated_locale(headers: &HeaderMap) -> Option<Locale> {
   headers
      .get(header::ACCEPT_LANGUAGE)
      .and_then(|value| value.to_str().ok())
      .and_then(Locale::negotiate)
}

/// `application/json` または `application/*+json` かどうか
fn has_json_content_type(headers: &HeaderMap) -> bool {
   let Some(content_type) = headers
      .get(header::CONTENT_TYPE)
      .and_then(|value| value.to_str().ok())
   else {
      return false;
   };

   let essence = content_type
      .split(';')
      .next()
      .unwrap_or_default()
      .trim()
      .to_ascii_lowercase();
   essence == "application/json"
      || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// serde の "missing field `name`" からフィールド名を取り出す
fn missing_field_name(message: &str) -> Option<&str> {
   message
      .strip_prefix("missing field `")?
      .split('`')
      .next()
}

/// serde が構造体に宣言しているフィールド名（rename 適用後）
///
/// 構造体以外の型では空を返す。
fn declared_fields<T: DeserializeOwned>() -> &'static [&'static str] {
   let mut fields: &'static [&'static str] = &[];
   let _ = T::deserialize(FieldCollector {
      fields: &mut fields,
   });
   fields
}

/// `deserialize_struct` に渡されるフィールド名だけを受け取るデシリアライザ
struct FieldCollector<'a> {
   fields: &'a mut &'static [&'static str],
}

impl<'de> Deserializer<'de> for FieldCollector<'_> {
   type Error = de::value::Error;

   fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
      Err(de::Error::custom("構造体ではありません"))
   }

   fn deserialize_struct<V: Visitor<'de>>(
      self,
      _name: &'static str,
      fields: &'static [&'static str],
      _visitor: V,
   ) -> Result<V::Value, Self::Error> {
      *self.fields = fields;
      Err(de::Error::custom("フィールド名のみを受け取ります"))
   }

   serde::forward_to_deserialize_any! {
      bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
      bytes byte_buf option unit unit_struct newtype_struct seq tuple
      tuple_struct map enum identifier ignored_any
   }
}

/// ある階層でのワイヤー上の名前の候補
///
/// validator は Rust のフィールド名で報告するため、serde の名前に引き直す。
struct WireNames<'a> {
   overrides:  &'a [(&'a str, &'a str)],
   candidates: Vec<&'a str>,
}

impl<'a> WireNames<'a> {
   fn new(overrides: &'a [(&'a str, &'a str)], declared: &'a [&'a str], value: Option<&'a Value>) -> Self {
      let mut candidates = declared.to_vec();
      if let Some(object) = value.and_then(Value::as_object) {
         candidates.extend(object.keys().map(String::as_str));
      }
      Self {
         overrides,
         candidates,
      }
   }

   /// 明示の対応 → 同名 → 区切りと大小文字を無視して一致する名前、の順に探す
   fn resolve(&self, field: &str) -> String {
      if let Some((_, wire)) = self.overrides.iter().find(|(name, _)| *name == field) {
         return (*wire).to_string();
      }
      if self.candidates.iter().any(|candidate| *candidate == field) {
         return field.to_string();
      }

      let folded = fold_case(field);
      self
         .candidates
         .iter()
         .find(|candidate| fold_case(candidate) == folded)
         .map_or_else(|| field.to_string(), |candidate| (*candidate).to_string())
   }
}

/// `nick_name` / `nickName` / `nick-name` を同じ形にそろえる
fn fold_case(name: &str) -> String {
   name
      .chars()
      .filter(|c| !matches!(c, '_' | '-'))
      .flat_map(char::to_lowercase)
      .collect()
}

fn collect_violations(
   violations: &ValidationErrors,
   prefix: &str,
   value: Option<&Value>,
   names: &WireNames<'_>,
   scope: &Scope<'_>,
   errors: &mut FieldErrors,
) {
   for (key, kind) in violations.errors() {
      let key: &str = key.as_ref();
      let wire = (key != "__all__").then(|| names.resolve(key));
      let path = match &wire {
         None => REQUEST_KEY.to_string(),
         Some(wire) if prefix.is_empty() => wire.clone(),
         Some(wire) => format!("{prefix}.{wire}"),
      };
      let child = wire
         .as_deref()
         .and_then(|wire| value.and_then(|value| value.get(wire)));

      match kind {
         ValidationErrorsKind::Field(field_errors) => {
            if let Some(first) = field_errors.first() {
               errors.insert(path.clone(), violation_message(first, &path, scope));
            }
         }
         ValidationErrorsKind::Struct(nested) => {
            let names = WireNames::new(&[], &[], child);
            collect_violations(nested, &path, child, &names, scope, errors);
         }
         ValidationErrorsKind::List(items) => {
            for (index, nested) in items {
               let item = child.and_then(|child| child.get(*index));
               let names = WireNames::new(&[], &[], item);
               collect_violations(nested, &format!("{path}[{index}]"), item, &names, scope, errors);
            }
         }
      }
   }
}

fn violation_message(violation: &ValidationError, field: &str, scope: &Scope<'_>) -> String {
   if let Some(message) = &violation.message {
      return message.to_string();
   }

   let params: Vec<(&str, String)> = violation
      .params
      .iter()
      .filter_map(|(name, value)| {
         let name: &str = name.as_ref();
         (name != "value").then(|| (name, param_text(value)))
      })
      .collect();
   scope.render(message_key(violation), field, &params)
}

/// validator のエラーコードとパラメータからメッセージキーを決める
fn message_key(violation: &ValidationError) -> &str {
   let has = |name: &str| violation.params.contains_key(name);
   let code: &str = violation.code.as_ref();

   match code {
      "length" if has("equal") => "length.equal",
      "length" if has("min") && has("max") => "length.between",
      "length" if has("min") => "length.min",
      "length" => "length.max",
      "range" if has("min") && has("max") => "range.between",
      "range" if has("min") => "range.min",
      "range" if has("max") => "range.max",
      "range" if has("exclusive_min") => "range.gt",
      "range" if has("exclusive_max") => "range.lt",
      other => other,
   }
}

fn param_text(value: &Value) -> String {
   match value {
      Value::String(s) => s.clone(),
      other => other.to_string(),
   }
}

#[cfg(test)]
mod tests {
   use std::{sync::Arc, thread};

   use axum::{body::Body, http::Request as HttpRequest};
   use pretty_assertions::assert_eq;
   use respkit_ecode::BusinessError;
   use rstest::rstest;
   use serde::Deserialize;

   use super::*;

   #[derive(Debug, Deserialize, Validate)]
   struct Member {
      #[validate(length(min = 1, max = 20))]
      name:  String,
      #[validate(range(min = 18))]
      age:   u8,
      #[validate(email)]
      email: Option<String>,
      phone: Option<String>,
   }

   impl Bindable for Member {
      const RULES: &'static [(&'static str, &'static str)] = &[("phone", "mobile")];
   }

   #[derive(Debug, Deserialize, Validate)]
   struct Order {
      #[validate(nested)]
      items: Vec<Item>,
   }

   impl Bindable for Order {}

   #[derive(Debug, Deserialize, Validate)]
   struct Item {
      #[validate(range(min = 1))]
      qty: u32,
   }

   #[derive(Debug, Deserialize, Validate)]
   struct Profile {
      #[serde(rename = "nickName")]
      #[validate(length(max = 5))]
      nick_name: String,
      #[validate(length(min = 8, message = "パスワードが短すぎます"))]
      password:  String,
   }

   impl Bindable for Profile {}

   #[derive(Debug, Deserialize, Validate)]
   #[serde(rename_all = "camelCase")]
   struct Account {
      #[validate(length(min = 3))]
      nick_name: String,
      #[validate(url)]
      home_page: Option<String>,
   }

   impl Bindable for Account {}

   #[derive(Debug, Deserialize, Validate)]
   struct Team {
      #[validate(nested)]
      members: Vec<Account>,
   }

   impl Bindable for Team {}

   #[derive(Debug, Deserialize, Validate)]
   struct Owner {
      #[validate(nested)]
      account: Account,
   }

   impl Bindable for Owner {}

   #[derive(Debug, Deserialize, Validate)]
   struct Contact {
      #[serde(rename = "tel")]
      #[validate(length(min = 10))]
      phone_number: String,
   }

   impl Bindable for Contact {
      const WIRE_NAMES: &'static [(&'static str, &'static str)] = &[("phone_number", "tel")];
   }

   #[derive(Debug, Deserialize, Validate)]
   struct Form {
      #[validate(length(min = 1))]
      name:  String,
      #[validate(range(min = 18))]
      age:   u8,
      #[validate(email)]
      email: String,
   }

   impl Bindable for Form {}

   #[derive(Debug, Deserialize, Validate)]
   struct Coupon {
      code: Option<String>,
   }

   impl Bindable for Coupon {
      const RULES: &'static [(&'static str, &'static str)] = &[("code", "coupon_code")];
   }

   fn mobile_rule() -> Rule {
      Rule::for_str("mobile", |s| {
         s.len() == 11 && s.starts_with('1') && s.chars().all(|c| c.is_ascii_digit())
      })
      .message(Locale::Ja, "{field}は正しい携帯電話番号ではありません")
      .message(Locale::En, "{field} must be a valid mobile number")
   }

   fn sut() -> Binder {
      let binder = Binder::new(Translator::new(Locale::Ja).unwrap());
      binder.register_rule(mobile_rule()).unwrap();
      binder
   }

   fn field_errors(result: Result<impl std::fmt::Debug, BindError>) -> FieldErrors {
      match result {
         Err(BindError::Invalid(errors)) => errors,
         other => panic!("expected BindError::Invalid, got {other:?}"),
      }
   }

   // ===== bind_json =====

   #[test]
   fn test_妥当なリクエストをバインドできる() {
      let body = br#"{"name":"taro","age":20,"email":"taro@example.com","phone":"13800138000"}"#;

      let member: Member = sut().bind_json(body, None).unwrap();

      assert_eq!(member.name, "taro");
      assert_eq!(member.age, 20);
   }

   #[test]
   fn test_必須フィールドの欠落はrequiredメッセージになる() {
      let errors = field_errors(sut().bind_json::<Member>(br#"{"age":20}"#, None));

      assert_eq!(errors.get("name"), Some("nameは必須項目です"));
      assert_eq!(errors.len(), 1);
   }

   #[test]
   fn test_型の不一致はフィールドのパスで報告される() {
      let errors = field_errors(sut().bind_json::<Member>(br#"{"name":"taro","age":"abc"}"#, None));

      assert_eq!(errors.get("age"), Some("データ型が正しくありません"));
   }

   #[rstest]
   #[case::構文エラー(br#"{"name":"#.as_slice())]
   #[case::空のボディ(b"".as_slice())]
   #[case::ルートが文字列(br#""hello""#.as_slice())]
   fn test_形式不正はrequestキーで報告される(#[case] body: &[u8]) {
      let errors = field_errors(sut().bind_json::<Member>(body, None));

      assert_eq!(
         errors.get(REQUEST_KEY),
         Some("リクエストの形式が正しくありません")
      );
      assert_eq!(errors.len(), 1);
   }

   #[test]
   fn test_deriveルール違反はパラメータ付きで翻訳される() {
      let errors = field_errors(sut().bind_json::<Member>(
         br#"{"name":"","age":17,"email":"not-an-email"}"#,
         None,
      ));

      assert_eq!(errors.get("name"), Some("nameは1〜20文字で入力してください"));
      assert_eq!(errors.get("age"), Some("ageは18以上である必要があります"));
      assert_eq!(
         errors.get("email"),
         Some("emailは正しいメールアドレスではありません")
      );
   }

   #[test]
   fn test_ロケールを指定すると英語で翻訳される() {
      let errors = field_errors(sut().bind_json::<Member>(br#"{"age":20}"#, Some(Locale::En)));

      assert_eq!(errors.get("name"), Some("name is a required field"));
   }

   #[test]
   fn test_実行時ルールに違反するとルールのメッセージになる() {
      let errors = field_errors(
         sut().bind_json::<Member>(br#"{"name":"taro","age":20,"phone":"12345"}"#, None),
      );

      assert_eq!(
         errors.get("phone"),
         Some("phoneは正しい携帯電話番号ではありません")
      );
   }

   #[rstest]
   #[case::未指定(br#"{"name":"taro","age":20}"#.as_slice())]
   #[case::null(br#"{"name":"taro","age":20,"phone":null}"#.as_slice())]
   fn test_実行時ルールは値がなければ適用しない(#[case] body: &[u8]) {
      assert!(sut().bind_json::<Member>(body, None).is_ok());
   }

   #[test]
   fn test_ネストしたリストはインデックス付きのパスになる() {
      let errors = field_errors(
         sut().bind_json::<Order>(br#"{"items":[{"qty":2},{"qty":0}]}"#, None),
      );

      assert_eq!(
         errors.get("items[1].qty"),
         Some("items[1].qtyは1以上である必要があります")
      );
      assert_eq!(errors.len(), 1);
   }

   #[test]
   fn test_ネストした型の不一致もパスで報告される() {
      let errors = field_errors(sut().bind_json::<Order>(br#"{"items":[{"qty":"x"}]}"#, None));

      assert_eq!(errors.get("items[0].qty"), Some("データ型が正しくありません"));
   }

   #[test]
   fn test_ワイヤー名で報告され明示メッセージが優先される() {
      let errors = field_errors(
         sut().bind_json::<Profile>(br#"{"nickName":"toolongname","password":"short"}"#, None),
      );

      assert_eq!(
         errors.get("nickName"),
         Some("nickNameは5文字以内で入力してください")
      );
      assert_eq!(errors.get("password"), Some("パスワードが短すぎます"));
   }

   #[rstest]
   #[case::ルール違反(br#"{"nickName":"ab"}"#.as_slice(), "nickNameは3文字以上で入力してください")]
   #[case::型の不一致(br#"{"nickName":5}"#.as_slice(), "データ型が正しくありません")]
   #[case::欠落(b"{}".as_slice(), "nickNameは必須項目です")]
   fn test_rename_allの名前で全分類が報告される(#[case] body: &[u8], #[case] message: &str) {
      let errors = field_errors(sut().bind_json::<Account>(body, None));

      assert_eq!(errors, field_errors_map(&[("nickName", message)]));
   }

   #[test]
   fn test_rename_allの複数語フィールドも変換される() {
      let errors = field_errors(
         sut().bind_json::<Account>(br#"{"nickName":"taro","homePage":"not a url"}"#, None),
      );

      assert_eq!(
         errors,
         field_errors_map(&[("homePage", "homePageは正しいURLではありません")])
      );
   }

   #[test]
   fn test_ネストした要素もserdeの名前で報告される() {
      let errors = field_errors(sut().bind_json::<Team>(
         br#"{"members":[{"nickName":"taro"},{"nickName":"ab"}]}"#,
         None,
      ));

      assert_eq!(
         errors,
         field_errors_map(&[(
            "members[1].nickName",
            "members[1].nickNameは3文字以上で入力してください"
         )])
      );
   }

   #[test]
   fn test_推測できない名前はwire_namesで指定する() {
      let errors = field_errors(sut().bind_json::<Contact>(br#"{"tel":"123"}"#, None));

      assert_eq!(
         errors,
         field_errors_map(&[("tel", "telは10文字以上で入力してください")])
      );
   }

   #[test]
   fn test_欠落したフィールドとルール違反をまとめて報告する() {
      let errors = field_errors(sut().bind_json::<Form>(br#"{"age":17}"#, None));

      assert_eq!(
         errors,
         field_errors_map(&[
            ("name", "nameは必須項目です"),
            ("age", "ageは18以上である必要があります"),
            ("email", "emailは必須項目です"),
         ])
      );
   }

   #[test]
   fn test_型の不一致と他のフィールドの違反をまとめて報告する() {
      let errors = field_errors(sut().bind_json::<Form>(
         br#"{"name":"","age":"abc","email":"taro@example.com"}"#,
         None,
      ));

      assert_eq!(
         errors,
         field_errors_map(&[
            ("name", "nameは1文字以上で入力してください"),
            ("age", "データ型が正しくありません"),
         ])
      );
   }

   #[test]
   fn test_欠落と実行時ルール違反をまとめて報告する() {
      let errors = field_errors(sut().bind_json::<Member>(br#"{"age":20,"phone":"12345"}"#, None));

      assert_eq!(
         errors,
         field_errors_map(&[
            ("name", "nameは必須項目です"),
            ("phone", "phoneは正しい携帯電話番号ではありません"),
         ])
      );
   }

   #[test]
   fn test_欠落したリストは必須として1件だけ報告される() {
      let errors = field_errors(sut().bind_json::<Order>(b"{}", None));

      assert_eq!(errors, field_errors_map(&[("items", "itemsは必須項目です")]));
   }

   #[test]
   fn test_ネストした要素の欠落はパス付きで報告される() {
      let errors = field_errors(sut().bind_json::<Team>(br#"{"members":[{}]}"#, None));

      assert_eq!(
         errors,
         field_errors_map(&[("members[0].nickName", "members[0].nickNameは必須項目です")])
      );
   }

   #[test]
   fn test_欠落したネストの構造体の中身は報告しない() {
      let errors = field_errors(sut().bind_json::<Owner>(b"{}", None));

      assert_eq!(errors, field_errors_map(&[("account", "accountは必須項目です")]));
   }

   #[test]
   fn test_未登録の実行時ルールはunknown_ruleになる() {
      let result = sut().bind_json::<Coupon>(br#"{"code":"ABC"}"#, None);

      assert!(matches!(result, Err(BindError::UnknownRule(name)) if name == "coupon_code"));
   }

   #[test]
   fn test_bind_errorはapi_errorに変換される() {
      let invalid = ApiError::from(field_errors_of(&[("name", "必須です")]));
      let unknown = ApiError::from(BindError::UnknownRule("coupon_code".to_string()));

      assert_eq!(
         invalid.as_business().map(|e| e.code()),
         Some(code::INVALID_PARAMS.code())
      );
      assert!(!unknown.is_business());
   }

   fn field_errors_of(entries: &[(&str, &str)]) -> BindError {
      BindError::Invalid(field_errors_map(entries))
   }

   fn field_errors_map(entries: &[(&str, &str)]) -> FieldErrors {
      let mut errors = FieldErrors::new();
      for (field, message) in entries {
         errors.insert(*field, *message);
      }
      errors
   }

   // ===== register_rule =====

   #[rstest]
   #[case("email")]
   #[case("length")]
   #[case("length.min")]
   #[case("malformed")]
   #[case("")]
   fn test_組み込みの名前では登録できない(#[case] name: &str) {
      let rule = Rule::new(name, |_| true).message(Locale::Ja, "{field}");

      let result = sut().register_rule(rule);

      assert!(matches!(result, Err(RuleError::Reserved(_))));
   }

   #[test]
   fn test_既定ロケールのメッセージがなければ登録できない() {
      let rule = Rule::new("even", |_| true).message(Locale::En, "{field} must be even");

      let result = sut().register_rule(rule);

      assert!(matches!(
         result,
         Err(RuleError::MissingMessage { locale: Locale::Ja, .. })
      ));
   }

   #[test]
   fn test_同名のルールは後勝ちで置き換わる() {
      let sut = sut();
      sut.register_rule(
         Rule::for_str("mobile", |_| false).message(Locale::Ja, "{field}は使用できません"),
      )
      .unwrap();

      let errors = field_errors(
         sut.bind_json::<Member>(br#"{"name":"taro","age":20,"phone":"13800138000"}"#, None),
      );

      assert_eq!(errors.get("phone"), Some("phoneは使用できません"));
   }

   #[test]
   fn test_並行してルールを登録できる() {
      let sut = Arc::new(sut());

      let handles: Vec<_> = (0..8)
         .map(|i| {
            let binder = Arc::clone(&sut);
            thread::spawn(move || {
               binder
                  .register_rule(
                     Rule::new(format!("rule_{i}"), |_| true)
                        .message(Locale::Ja, format!("{{field}}はルール{i}に違反しています")),
                  )
                  .unwrap();
               binder.register_rule(mobile_rule()).unwrap();
            })
         })
         .collect();
      for handle in handles {
         handle.join().unwrap();
      }

      assert_eq!(sut.rules.len(), 1 + 8);
      let scope = sut.translator().scope(None);
      for i in 0..8 {
         assert_eq!(
            scope.render(&format!("rule_{i}"), "code", &[]),
            format!("codeはルール{i}に違反しています")
         );
      }
      let errors = field_errors(
         sut.bind_json::<Member>(br#"{"name":"taro","age":20,"phone":"12345"}"#, None),
      );
      assert_eq!(
         errors.get("phone"),
         Some("phoneは正しい携帯電話番号ではありません")
      );
   }

   // ===== bind_request =====

   fn json_request(body: &'static str) -> HttpRequest<Body> {
      HttpRequest::builder()
         .method("POST")
         .uri("/")
         .header(header::CONTENT_TYPE, "application/json")
         .body(Body::from(body))
         .unwrap()
   }

   #[tokio::test]
   async fn test_bind_request_accept_languageでロケールを選ぶ() {
      let mut request = json_request(r#"{"age":20}"#);
      request
         .headers_mut()
         .insert(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9".parse().unwrap());

      let errors = field_errors(sut().bind_request::<Member>(request).await);

      assert_eq!(errors.get("name"), Some("name is a required field"));
   }

   #[tokio::test]
   async fn test_bind_request_json以外のcontent_typeは形式不正() {
      let request = HttpRequest::builder()
         .method("POST")
         .uri("/")
         .header(header::CONTENT_TYPE, "text/plain")
         .body(Body::from(r#"{"name":"taro","age":20}"#))
         .unwrap();

      let errors = field_errors(sut().bind_request::<Member>(request).await);

      assert!(errors.contains_key(REQUEST_KEY));
   }

   #[tokio::test]
   async fn test_bind_request_上限を超えるボディは形式不正() {
      let binder = sut().with_body_limit(8);

      let errors = field_errors(
         binder
            .bind_request::<Member>(json_request(r#"{"name":"taro","age":20}"#))
            .await,
      );

      assert!(errors.contains_key(REQUEST_KEY));
   }

   #[rstest]
   #[case("application/json", true)]
   #[case("application/json; charset=utf-8", true)]
   #[case("application/problem+json", true)]
   #[case("text/plain", false)]
   fn test_json_content_typeの判定(#[case] content_type: &str, #[case] expected: bool) {
      let mut headers = HeaderMap::new();
      headers.insert(header::CONTENT_TYPE, content_type.parse().unwrap());

      assert_eq!(has_json_content_type(&headers), expected);
   }
}
