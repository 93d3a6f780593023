//! JSON views of the page content.

use crate::content::{survey::LocalizedSurvey, Survey, Translation};
use crate::models::{Lang, Ornament};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

impl LangQuery {
    pub fn lang(&self) -> Lang {
        Lang::from_query(self.lang.as_deref())
    }
}

/// Encyclopedia entry with name and meaning resolved for one language.
#[derive(Debug, Serialize)]
pub struct OrnamentView {
    #[serde(flatten)]
    pub ornament: Ornament,
    pub lang: Lang,
    pub name: String,
    pub meaning: String,
}

impl OrnamentView {
    pub fn new(ornament: &Ornament, lang: Lang) -> Self {
        Self {
            name: ornament.name(lang).to_string(),
            meaning: ornament.meaning(lang).to_string(),
            ornament: ornament.clone(),
            lang,
        }
    }
}

pub async fn translation(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> Result<Json<Translation>, AppError> {
    let lang: Lang = lang
        .parse()
        .map_err(|e| AppError::NotFound(anyhow::Error::new(e)))?;

    Ok(Json(state.content.translation(lang).clone()))
}

pub async fn list_ornaments(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Json<Vec<OrnamentView>> {
    let lang = query.lang();
    Json(
        state
            .content
            .ornaments()
            .iter()
            .map(|o| OrnamentView::new(o, lang))
            .collect(),
    )
}

pub async fn get_ornament(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(query): Query<LangQuery>,
) -> Result<Json<OrnamentView>, AppError> {
    state
        .content
        .ornament(id)
        .map(|o| Json(OrnamentView::new(o, query.lang())))
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Ornament {} not found", id)))
}

pub async fn survey(Query(query): Query<LangQuery>) -> Json<LocalizedSurvey> {
    Json(Survey::get().localize(query.lang()))
}
