use crate::models::Lang;
use serde::{Deserialize, Serialize};

/// Per-language text of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub title: String,
    pub subtitle: String,
    pub hero_desc: String,
    pub button_learn: String,
    pub button_recognize: String,
    pub nav_encyclopedia: String,
    pub recognize_title: String,
    pub recognize_desc: String,
    pub survey_title: String,
    pub footer: String,
}

impl Translation {
    /// First sentence of `hero_desc`, including its full stop.
    pub fn hero_headline(&self) -> &str {
        match self.hero_desc.find('.') {
            Some(end) => &self.hero_desc[..=end],
            None => &self.hero_desc,
        }
    }

    /// Remainder of `hero_desc` after the headline.
    pub fn hero_lead(&self) -> &str {
        match self.hero_desc.find('.') {
            Some(end) => self.hero_desc[end + 1..].trim(),
            None => "",
        }
    }
}

/// Short interface strings that are not part of the translation table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageLabels {
    pub learn_more: &'static str,
    pub analyzing: &'static str,
    pub result_placeholder: &'static str,
    pub meaning: &'static str,
    pub usage: &'static str,
    pub upload_hint: &'static str,
    pub no_image_alert: &'static str,
    pub recognition_failed: &'static str,
}

impl PageLabels {
    pub fn for_lang(lang: Lang) -> Self {
        match lang {
            Lang::Kz => PageLabels {
                learn_more: "Толығырақ",
                analyzing: "Талдау жүруде...",
                result_placeholder: "AI нәтижесі осында пайда болады",
                meaning: "Мағынасы",
                usage: "Қолдану аясы",
                upload_hint: "Суретті осында сүйреңіз немесе басып жүктеңіз",
                no_image_alert: "Алдымен суретті жүктеңіз!",
                recognition_failed: "Оюды тану мүмкін болмады. Қайталап көріңіз.",
            },
            Lang::Ru => PageLabels {
                learn_more: "Подробнее",
                analyzing: "Анализ...",
                result_placeholder: "Результат AI появится здесь",
                meaning: "Значение",
                usage: "Традиционное применение",
                upload_hint: "Перетащите изображение или нажмите для загрузки",
                no_image_alert: "Сначала загрузите изображение!",
                recognition_failed: "Не удалось распознать узор. Попробуйте ещё раз.",
            },
            Lang::En => PageLabels {
                learn_more: "Learn More",
                analyzing: "Analyzing...",
                result_placeholder: "AI Result will appear here",
                meaning: "Meaning",
                usage: "Traditional Usage",
                upload_hint: "Drag and drop or click to upload",
                no_image_alert: "Please upload an image first!",
                recognition_failed: "Recognition failed. Please try again.",
            },
        }
    }
}
