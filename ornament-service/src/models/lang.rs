//! Page and content languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Language codes used across content, page and recognition results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Kz,
    Ru,
    En,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported language '{0}', expected one of kz, ru, en")]
pub struct UnknownLang(pub String);

impl Lang {
    pub const ALL: [Lang; 3] = [Lang::Kz, Lang::Ru, Lang::En];

    pub fn code(self) -> &'static str {
        match self {
            Lang::Kz => "kz",
            Lang::Ru => "ru",
            Lang::En => "en",
        }
    }

    /// English name of the language, used when instructing the model.
    pub fn english_name(self) -> &'static str {
        match self {
            Lang::Kz => "Kazakh",
            Lang::Ru => "Russian",
            Lang::En => "English",
        }
    }

    /// Order in which localized variants are tried: the requested language
    /// first, then Kazakh, Russian and English.
    pub fn fallback_chain(self) -> [Lang; 4] {
        [self, Lang::Kz, Lang::Ru, Lang::En]
    }

    /// Parse a `?lang=` style value, falling back to the default language.
    pub fn from_query(value: Option<&str>) -> Lang {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Lang {
    type Err = UnknownLang;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kz" => Ok(Lang::Kz),
            "ru" => Ok(Lang::Ru),
            "en" => Ok(Lang::En),
            _ => Err(UnknownLang(s.to_string())),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Resolve a localized text field following [`Lang::fallback_chain`].
/// Blank variants count as missing.
pub fn localized<'a, F>(lang: Lang, variant: F) -> Option<&'a str>
where
    F: Fn(Lang) -> Option<&'a str>,
{
    lang.fallback_chain()
        .into_iter()
        .filter_map(variant)
        .find(|text| !text.trim().is_empty())
}
