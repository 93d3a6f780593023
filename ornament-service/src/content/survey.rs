//! Fixed results of the ornament awareness survey.

use crate::models::Lang;
use serde::Serialize;

/// Number of survey responses the figures are based on.
pub const RESPONDENTS: u32 = 42;

/// Slice colours for the awareness split.
pub const AWARENESS_COLORS: [&str; 2] = ["#cc0000", "#00afca"];

/// Bar colour for the recognisability chart.
pub const BAR_COLOR: &str = "#f5ba45";

/// One labelled percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyPoint {
    /// Labels in kz, ru, en order.
    labels: [&'static str; 3],
    pub value: f64,
}

impl SurveyPoint {
    const fn new(kz: &'static str, ru: &'static str, en: &'static str, value: f64) -> Self {
        Self {
            labels: [kz, ru, en],
            value,
        }
    }

    pub fn label(&self, lang: Lang) -> &'static str {
        match lang {
            Lang::Kz => self.labels[0],
            Lang::Ru => self.labels[1],
            Lang::En => self.labels[2],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Survey {
    /// Share of respondents who do / do not know the symbolic meaning.
    pub awareness: [SurveyPoint; 2],
    /// Share of respondents recognising each ornament.
    pub recognisability: [SurveyPoint; 3],
}

const SURVEY: Survey = Survey {
    awareness: [
        SurveyPoint::new("Білмейді", "Не знают", "Unknown", 59.5),
        SurveyPoint::new("Біледі", "Знают", "Known", 40.5),
    ],
    recognisability: [
        SurveyPoint::new("Түйе табан", "Верблюжий след", "Camel footprint", 45.2),
        SurveyPoint::new("Қошқар мүйіз", "Бараний рог", "Ram's horn", 42.9),
        SurveyPoint::new("Құс қанаты", "Птичье крыло", "Bird's wing", 35.7),
    ],
};

impl Survey {
    pub fn get() -> &'static Survey {
        &SURVEY
    }

    pub fn awareness_caption(lang: Lang) -> String {
        let tail = match lang {
            Lang::Kz => "орнаменттердің символдық мәнін білмейді",
            Lang::Ru => "не знают символическое значение орнаментов",
            Lang::En => "do not know the symbolic meaning",
        };
        format!("{}% {}", SURVEY.awareness[0].value, tail)
    }

    pub fn recognisability_title(lang: Lang) -> &'static str {
        match lang {
            Lang::Kz => "Орнаменттердің танылуы",
            Lang::Ru => "Узнаваемость узоров",
            Lang::En => "Ornament recognisability",
        }
    }

    pub fn source_note(lang: Lang) -> String {
        match lang {
            Lang::Kz => format!("Зерттеудің {} жауабына негізделген деректер.", RESPONDENTS),
            Lang::Ru => format!("Данные на основе {} ответов исследования.", RESPONDENTS),
            Lang::En => format!("Based on {} survey responses.", RESPONDENTS),
        }
    }

    /// Survey with labels and captions resolved for one language.
    pub fn localize(&self, lang: Lang) -> LocalizedSurvey {
        let series = |points: &[SurveyPoint], colors: &[&'static str]| {
            points
                .iter()
                .enumerate()
                .map(|(i, p)| LocalizedPoint {
                    label: p.label(lang),
                    value: p.value,
                    color: colors[i % colors.len()],
                })
                .collect::<Vec<_>>()
        };

        LocalizedSurvey {
            lang,
            respondents: RESPONDENTS,
            awareness_title: format!(
                "{} vs {}",
                self.awareness[0].label(lang),
                self.awareness[1].label(lang)
            ),
            awareness_caption: Self::awareness_caption(lang),
            awareness: series(&self.awareness[..], &AWARENESS_COLORS[..]),
            recognisability_title: Self::recognisability_title(lang),
            recognisability: series(&self.recognisability[..], &[BAR_COLOR][..]),
            source_note: Self::source_note(lang),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalizedPoint {
    pub label: &'static str,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalizedSurvey {
    pub lang: Lang,
    pub respondents: u32,
    pub awareness_title: String,
    pub awareness_caption: String,
    pub awareness: Vec<LocalizedPoint>,
    pub recognisability_title: &'static str,
    pub recognisability: Vec<LocalizedPoint>,
    pub source_note: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn awareness_split_sums_to_hundred() {
        let total: f64 = Survey::get().awareness.iter().map(|p| p.value).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn recognisability_is_sorted_descending() {
        let values: Vec<f64> = Survey::get().recognisability.iter().map(|p| p.value).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn localized_labels_follow_language() {
        let ru = Survey::get().localize(Lang::Ru);
        assert_eq!(ru.awareness_title, "Не знают vs Знают");
        assert_eq!(ru.awareness[0].color, "#cc0000");
        assert_eq!(ru.recognisability[1].label, "Бараний рог");
        assert_eq!(ru.recognisability[2].color, BAR_COLOR);

        let kz = Survey::get().localize(Lang::Kz);
        assert_eq!(
            kz.awareness_caption,
            "59.5% орнаменттердің символдық мәнін білмейді"
        );
        assert!(kz.source_note.contains("42"));
    }
}
