//! Page rendering and JSON content endpoints.

mod common;

use common::{fenced_reply, TestApp};
use ornament_service::services::providers::mock::MockVisionProvider;
use serde_json::Value;
use std::sync::Arc;

async fn spawn() -> TestApp {
    TestApp::spawn(Arc::new(MockVisionProvider::replying(fenced_reply()))).await
}

#[tokio::test]
async fn page_renders_in_every_language() {
    let app = spawn().await;

    for (lang, heading) in [
        ("kz", "Ою-өрнек энциклопедиясы"),
        ("ru", "Энциклопедия орнаментов"),
        ("en", "Ornament encyclopedia"),
    ] {
        let response = app.get(&format!("/?lang={}", lang)).await;
        assert_eq!(response.status().as_u16(), 200);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let html = response.text().await.unwrap();
        assert!(html.contains(&format!("<html lang=\"{}\">", lang)));
        assert!(html.contains(heading), "{} page lacks {}", lang, heading);
    }
}

#[tokio::test]
async fn page_defaults_to_kazakh() {
    let app = spawn().await;

    for path in ["/", "/?lang=de"] {
        let html = app.get(path).await.text().await.unwrap();
        assert!(html.contains("<html lang=\"kz\">"));
        assert!(html.contains("Сырлы Ою"));
    }
}

#[tokio::test]
async fn page_shows_survey_figures() {
    let app = spawn().await;

    let html = app.get("/?lang=en").await.text().await.unwrap();

    assert!(html.contains("conic-gradient(#cc0000 0% 59.5%, #00afca 59.5% 100%)"));
    assert!(html.contains("45.2%"));
    assert!(html.contains("59.5% do not know the symbolic meaning"));
}

#[tokio::test]
async fn translation_table_per_language() {
    let app = spawn().await;

    let response = app.get("/api/translations/en").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], "Syrly Oyu");

    let response = app.get("/api/translations/de").await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn ornaments_fall_back_to_kazakh() {
    let app = spawn().await;

    let body: Value = app.get("/api/ornaments?lang=en").await.json().await.unwrap();
    let entries = body.as_array().unwrap();
    assert!(entries.len() >= 7);

    let ram = entries.iter().find(|e| e["id"] == 1).unwrap();
    assert_eq!(ram["name"], "Ram's horn");
    assert_eq!(ram["name_kz"], "Қошқар мүйіз");

    let untranslated = entries.iter().find(|e| e["name_en"].is_null()).unwrap();
    assert_eq!(untranslated["name"], untranslated["name_kz"]);
    assert_eq!(untranslated["meaning"], untranslated["meaning_kz"]);
}

#[tokio::test]
async fn single_ornament_lookup() {
    let app = spawn().await;

    let body: Value = app.get("/api/ornaments/1?lang=ru").await.json().await.unwrap();
    assert_eq!(body["name"], "Бараний рог");
    assert_eq!(body["lang"], "ru");

    assert_eq!(app.get("/api/ornaments/999").await.status().as_u16(), 404);
}

#[tokio::test]
async fn survey_percentages_are_localized() {
    let app = spawn().await;

    let body: Value = app.get("/api/survey?lang=ru").await.json().await.unwrap();

    let awareness: f64 = body["awareness"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["value"].as_f64().unwrap())
        .sum();
    assert!((awareness - 100.0).abs() < 1e-9);
    assert_eq!(body["respondents"], 42);
    assert_eq!(body["recognisability"][0]["label"], "Верблюжий след");
}
