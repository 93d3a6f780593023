//! Ornament records: recognition results and encyclopedia entries.

use super::lang::{localized, Lang};
use serde::{Deserialize, Serialize};

/// Ornament interpretation returned by the recognition model.
///
/// Every field is optional: the model is free to omit any of them, and
/// readers resolve localized fields with the language fallback chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrnamentDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_kz: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ru: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_kz: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_ru: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

impl OrnamentDescription {
    /// Field names the model is instructed to return.
    pub const FIELDS: [&'static str; 7] = [
        "name_kz",
        "name_ru",
        "name_en",
        "meaning_kz",
        "meaning_ru",
        "meaning_en",
        "usage",
    ];

    fn name_variant(&self, lang: Lang) -> Option<&str> {
        match lang {
            Lang::Kz => self.name_kz.as_deref(),
            Lang::Ru => self.name_ru.as_deref(),
            Lang::En => self.name_en.as_deref(),
        }
    }

    fn meaning_variant(&self, lang: Lang) -> Option<&str> {
        match lang {
            Lang::Kz => self.meaning_kz.as_deref(),
            Lang::Ru => self.meaning_ru.as_deref(),
            Lang::En => self.meaning_en.as_deref(),
        }
    }

    pub fn name(&self, lang: Lang) -> Option<&str> {
        localized(lang, |l| self.name_variant(l))
    }

    pub fn meaning(&self, lang: Lang) -> Option<&str> {
        localized(lang, |l| self.meaning_variant(l))
    }

    /// True when at least one language variant of the name is non-blank.
    pub fn has_name(&self) -> bool {
        self.name(Lang::Kz).is_some()
    }
}

/// Encyclopedia entry shown on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ornament {
    pub id: u32,
    pub category: String,
    pub name_kz: String,
    #[serde(default)]
    pub name_ru: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    pub meaning_kz: String,
    #[serde(default)]
    pub meaning_ru: Option<String>,
    #[serde(default)]
    pub meaning_en: Option<String>,
}

impl Ornament {
    pub fn name(&self, lang: Lang) -> &str {
        localized(lang, |l| match l {
            Lang::Kz => Some(self.name_kz.as_str()),
            Lang::Ru => self.name_ru.as_deref(),
            Lang::En => self.name_en.as_deref(),
        })
        .unwrap_or(&self.name_kz)
    }

    pub fn meaning(&self, lang: Lang) -> &str {
        localized(lang, |l| match l {
            Lang::Kz => Some(self.meaning_kz.as_str()),
            Lang::Ru => self.meaning_ru.as_deref(),
            Lang::En => self.meaning_en.as_deref(),
        })
        .unwrap_or(&self.meaning_kz)
    }
}
