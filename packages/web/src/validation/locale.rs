use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 対応ロケール
///
/// 言語タグの主サブタグ（`ja`, `en`）で識別し、大文字小文字は区別しない。
#[derive(
   Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
   #[default]
   Ja,
   En,
}

impl Locale {
   /// `Accept-Language` ヘッダから対応ロケールを選ぶ
   ///
   /// 品質値 `q` の高い順に主サブタグを照合し、最初に一致したロケールを返す。
   /// `q=0` は除外する。一致しなければ `None`。
   pub fn negotiate(accept_language: &str) -> Option<Self> {
      let mut candidates: Vec<(&str, f32)> = accept_language
         .split(',')
         .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() {
               return None;
            }
            let quality = parts
               .find_map(|param| param.trim().strip_prefix("q="))
               .and_then(|q| q.trim().parse::<f32>().ok())
               .unwrap_or(1.0);
            Some((tag, quality))
         })
         .collect();

      candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

      candidates
         .into_iter()
         .filter(|(_, quality)| *quality > 0.0)
         .find_map(|(tag, _)| tag.split('-').next()?.parse().ok())
   }
}
