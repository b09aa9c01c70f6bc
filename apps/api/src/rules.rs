//! # 実行時検証ルール
//!
//! 型の derive では表現しにくい検証を、起動時にバインダーへ登録する。

use regex::Regex;
use respkit_web::validation::{Binder, Locale, Rule};

/// 携帯電話番号（11 桁、`1` + `3`〜`9` で始まる）
pub const MOBILE_PATTERN: &str = r"^1[3-9]\d{9}$";

pub fn mobile_rule() -> Result<Rule, regex::Error> {
   let pattern = Regex::new(MOBILE_PATTERN)?;
   let rule = Rule::for_str("mobile", move |value| pattern.is_match(value))
      .message(Locale::Ja, "{field}は正しい携帯電話番号ではありません")
      .message(Locale::En, "{field} must be a valid mobile number");
   Ok(rule)
}

/// アプリケーションの実行時ルールをすべて登録する
pub fn register_rules(binder: &Binder) -> anyhow::Result<()> {
   binder.register_rule(mobile_rule()?)?;
   Ok(())
}

#[cfg(test)]
mod tests {
   use rstest::rstest;
   use serde_json::json;

   use super::*;

   #[rstest]
   #[case("13800138000", true)]
   #[case("19912345678", true)]
   #[case("12345678901", false)]
   #[case("1380013800", false)]
   #[case("138001380000", false)]
   #[case("1380013800a", false)]
   fn test_mobileルールは11桁の携帯番号のみ通す(#[case] phone: &str, #[case] expected: bool) {
      assert_eq!(mobile_rule().unwrap().check(&json!(phone)), expected);
   }

   #[test]
   fn test_mobileルールは文字列以外を通さない() {
      assert!(!mobile_rule().unwrap().check(&json!(13800138000_u64)));
   }
}
