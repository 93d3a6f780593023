//! Server-rendered encyclopedia page.

use crate::content::{survey::LocalizedSurvey, ContentCatalog, PageLabels, Survey, Translation};
use crate::handlers::content::LangQuery;
use crate::models::Lang;
use crate::startup::AppState;
use askama::Template;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

/// Language switcher entry.
#[derive(Debug, Clone)]
pub struct LangLink {
    pub code: &'static str,
    pub label: String,
    pub active: bool,
}

/// Encyclopedia card text in the page language.
#[derive(Debug, Clone)]
pub struct OrnamentCard {
    pub id: u32,
    pub category: String,
    pub name: String,
    pub meaning: String,
}

/// Recognisability bar scaled against the tallest one.
#[derive(Debug, Clone)]
pub struct SurveyBar {
    pub label: &'static str,
    pub value: f64,
    pub color: &'static str,
    /// Height in percent of the chart area.
    pub height: f64,
}

/// Everything the page template needs for one language.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub lang: Lang,
    pub langs: Vec<LangLink>,
    pub t: Translation,
    pub labels: PageLabels,
    pub labels_json: String,
    pub ornaments: Vec<OrnamentCard>,
    pub survey: LocalizedSurvey,
    pub pie_gradient: String,
    pub bars: Vec<SurveyBar>,
}

impl IndexTemplate {
    pub fn new(content: &ContentCatalog, lang: Lang) -> Self {
        let labels = PageLabels::for_lang(lang);
        let survey = Survey::get().localize(lang);

        let langs = Lang::ALL
            .into_iter()
            .map(|l| LangLink {
                code: l.code(),
                label: l.code().to_uppercase(),
                active: l == lang,
            })
            .collect();

        let ornaments = content
            .ornaments()
            .iter()
            .map(|o| OrnamentCard {
                id: o.id,
                category: o.category.clone(),
                name: o.name(lang).to_string(),
                meaning: o.meaning(lang).to_string(),
            })
            .collect();

        let bar_max = survey
            .recognisability
            .iter()
            .map(|p| p.value)
            .fold(0.0_f64, f64::max);
        let bars = survey
            .recognisability
            .iter()
            .map(|p| SurveyBar {
                label: p.label,
                value: p.value,
                color: p.color,
                height: if bar_max > 0.0 {
                    (p.value / bar_max * 100.0).round()
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            lang,
            langs,
            t: content.translation(lang).clone(),
            labels_json: script_json(&labels),
            labels,
            ornaments,
            pie_gradient: pie_gradient(&survey),
            bars,
            survey,
        }
    }
}

/// `conic-gradient` stops for the awareness split.
fn pie_gradient(survey: &LocalizedSurvey) -> String {
    let mut start = 0.0;
    let stops: Vec<String> = survey
        .awareness
        .iter()
        .map(|p| {
            let end = start + p.value;
            let stop = format!("{} {}% {}%", p.color, start, end);
            start = end;
            stop
        })
        .collect();
    format!("conic-gradient({})", stops.join(", "))
}

/// JSON safe to embed inside a `<script>` element.
fn script_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/")
}

/// `GET /?lang=kz|ru|en`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> impl IntoResponse {
    IndexTemplate::new(&state.content, query.lang())
}
