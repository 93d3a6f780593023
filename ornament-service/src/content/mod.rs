//! Static page content: translations, encyclopedia and survey data.
//!
//! The JSON tables are compiled into the binary and validated once at
//! startup.

pub mod survey;
pub mod translation;

pub use survey::{Survey, SurveyPoint};
pub use translation::{PageLabels, Translation};

use crate::models::{Lang, Ornament};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

const TRANSLATIONS_JSON: &str = include_str!("../../data/translations.json");
const ORNAMENTS_JSON: &str = include_str!("../../data/ornaments.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to parse {table}: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Translation table has no entry for '{0}'")]
    MissingLanguage(Lang),

    #[error("Ornament id {0} appears more than once")]
    DuplicateOrnament(u32),

    #[error("Ornament list is empty")]
    NoOrnaments,
}

/// Read-only content shared by the page and the JSON content endpoints.
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    translations: HashMap<Lang, Translation>,
    ornaments: Vec<Ornament>,
}

impl ContentCatalog {
    /// Content compiled into the binary.
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json(TRANSLATIONS_JSON, ORNAMENTS_JSON)
    }

    pub fn from_json(translations: &str, ornaments: &str) -> Result<Self, ContentError> {
        let translations: HashMap<Lang, Translation> =
            serde_json::from_str(translations).map_err(|source| ContentError::Parse {
                table: "translations",
                source,
            })?;

        if let Some(missing) = Lang::ALL.into_iter().find(|l| !translations.contains_key(l)) {
            return Err(ContentError::MissingLanguage(missing));
        }

        let ornaments: Vec<Ornament> =
            serde_json::from_str(ornaments).map_err(|source| ContentError::Parse {
                table: "ornaments",
                source,
            })?;

        if ornaments.is_empty() {
            return Err(ContentError::NoOrnaments);
        }

        let mut seen = HashSet::new();
        if let Some(dup) = ornaments.iter().find(|o| !seen.insert(o.id)) {
            return Err(ContentError::DuplicateOrnament(dup.id));
        }

        Ok(Self {
            translations,
            ornaments,
        })
    }

    pub fn translation(&self, lang: Lang) -> &Translation {
        // Every language is checked in `from_json`.
        &self.translations[&lang]
    }

    pub fn ornaments(&self) -> &[Ornament] {
        &self.ornaments
    }

    pub fn ornament(&self, id: u32) -> Option<&Ornament> {
        self.ornaments.iter().find(|o| o.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ORNAMENT: &str =
        r#"[{"id":1,"category":"geometric","name_kz":"Тұмарша","meaning_kz":"Тұмар"}]"#;

    #[test]
    fn embedded_content_loads() {
        let catalog = ContentCatalog::embedded().unwrap();
        assert_eq!(catalog.translation(Lang::En).title, "Syrly Oyu");
        assert!(catalog.ornaments().len() >= 3);
        assert!(catalog.ornament(1).is_some());
    }

    #[test]
    fn embedded_content_covers_survey_ornaments() {
        let catalog = ContentCatalog::embedded().unwrap();
        for point in Survey::get().recognisability {
            assert!(
                catalog.ornaments().iter().any(|o| o.name_kz == point.label(Lang::Kz)),
                "no entry for {}",
                point.label(Lang::Kz)
            );
        }
    }

    #[test]
    fn missing_language_is_rejected() {
        let mut table: serde_json::Value = serde_json::from_str(TRANSLATIONS_JSON).unwrap();
        table.as_object_mut().unwrap().remove("en");

        let err = ContentCatalog::from_json(&table.to_string(), ONE_ORNAMENT).unwrap_err();
        assert!(matches!(err, ContentError::MissingLanguage(Lang::En)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let ornaments = format!(
            "[{0},{0}]",
            r#"{"id":3,"category":"geometric","name_kz":"Тұмарша","meaning_kz":"Тұмар"}"#
        );
        let err = ContentCatalog::from_json(TRANSLATIONS_JSON, &ornaments).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateOrnament(3)));
    }

    #[test]
    fn empty_ornament_list_is_rejected() {
        let err = ContentCatalog::from_json(TRANSLATIONS_JSON, "[]").unwrap_err();
        assert!(matches!(err, ContentError::NoOrnaments));
    }
}
