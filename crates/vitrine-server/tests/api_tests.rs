// Routes exercised through the router with an in-memory store and fixture catalog

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use vitrine::{CatalogFixture, Config, LazyMode, MemoryCatalog, SqlSectionStore};
use vitrine_cache::{CacheConfig, ResponseCache};
use vitrine_server::{app, AppState};

async fn test_app(mut config: Config) -> Router {
    config.homepage.legacy_banners = false;
    let fixture: CatalogFixture = serde_json::from_value(json!({
        "sliders": [{"_id": "s1", "imageUrl": "/s1.jpg"}],
        "brands": [{"_id": "b1", "name": "Avène"}]
    }))
    .unwrap();

    let store = SqlSectionStore::connect("sqlite::memory:").await.unwrap();
    let state = AppState::new(
        Arc::new(store),
        Arc::new(MemoryCatalog::new(fixture)),
        ResponseCache::new(CacheConfig::default()),
        config,
    );
    app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, text) = send(app, Method::POST, "/sections", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", text);
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn test_create_then_list() {
    let app = test_app(Config::default()).await;
    let created = create(&app, json!({"name": "Hero", "type": "heroSlider"})).await;
    assert_eq!(created["type"], "heroSlider");
    assert_eq!(created["ordering"], 0);

    let (status, text) = send(&app, Method::GET, "/sections?type=heroSlider", None).await;
    assert_eq!(status, StatusCode::OK);
    let list: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], created["id"]);
}

#[rstest]
#[case("/sections?isActive&isPublished", 1)]
#[case("/sections?isActive=true&isPublished=1", 1)]
#[case("/sections?isPublished=false", 1)]
#[case("/sections", 2)]
#[tokio::test]
async fn test_list_flag_forms(#[case] uri: &str, #[case] expected: usize) {
    let app = test_app(Config::default()).await;
    create(&app, json!({"name": "Live", "type": "brandGrid"})).await;
    create(&app, json!({"name": "Draft", "type": "brandGrid", "isPublished": false})).await;

    let (status, text) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK, "{}", text);
    let list: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(list.len(), expected);
}

#[rstest]
#[case(json!({"type": "heroSlider"}))]
#[case(json!({"name": "Hero"}))]
#[case(json!({"name": "Hero", "type": "carousel3d"}))]
#[tokio::test]
async fn test_invalid_payload_is_400(#[case] body: Value) {
    let app = test_app(Config::default()).await;
    let (status, text) = send(&app, Method::POST, "/sections", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&text).unwrap();
    assert!(error["error"].as_str().unwrap().starts_with("validation failed"));
}

#[tokio::test]
async fn test_unknown_section_is_404() {
    let app = test_app(Config::default()).await;
    let (status, _) = send(&app, Method::GET, "/sections/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, "/sections/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = test_app(Config::default()).await;
    let created = create(&app, json!({"name": "Brands", "type": "brandGrid"})).await;
    let uri = format!("/sections/{}", created["id"].as_str().unwrap());

    let (status, text) = send(&app, Method::PUT, &uri, Some(json!({"title": "Our brands"}))).await;
    assert_eq!(status, StatusCode::OK);
    let updated: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(updated["title"], "Our brands");
    assert_eq!(updated["name"], "Brands");

    let (status, text) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, r#"{"deleted":true}"#);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reorder_unknown_id() {
    let app = test_app(Config::default()).await;
    let body = json!({"order": [{"id": "x", "ordering": 5}]});
    let (status, text) = send(&app, Method::PATCH, "/sections/reorder", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, r#"{"updated":0}"#);
}

#[tokio::test]
async fn test_public_data_requires_visibility() {
    let app = test_app(Config::default()).await;
    let draft = create(&app, json!({"name": "Brands", "type": "brandGrid", "isPublished": false})).await;
    let id = draft["id"].as_str().unwrap();

    let (status, _) = send(&app, Method::GET, &format!("/sections/{}/data/public", id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The admin view still resolves it
    let (status, text) = send(&app, Method::GET, &format!("/sections/{}/data", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let data: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(data["kind"], "brands");
    assert_eq!(data["data"][0]["name"], "Avène");
}

#[tokio::test]
async fn test_fragment_endpoint() {
    let app = test_app(Config::default()).await;
    let brands = create(&app, json!({"name": "Brands", "type": "brandGrid"})).await;

    let uri = format!("/sections/{}/fragment", brands["id"].as_str().unwrap());
    let (status, html) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("data-section-type=\"brandGrid\""));
}

#[tokio::test]
async fn test_homepage_html_with_client_placeholders() {
    let app = test_app(Config::default()).await;
    create(&app, json!({"name": "Hero", "type": "heroSlider", "ordering": 0})).await;
    create(&app, json!({"name": "News", "type": "scrollingText", "ordering": 1, "config": {"items": ["Free delivery"]}})).await;
    create(&app, json!({"name": "Brands", "type": "brandGrid", "ordering": 2})).await;

    let (status, html) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);

    let ticker = html.find("Free delivery").unwrap();
    let header = html.find("site-header").unwrap();
    assert!(ticker < header);
    assert!(html.contains("hx-trigger=\"revealed once\""));
}

#[tokio::test]
async fn test_homepage_inline_mode_has_no_placeholders() {
    let mut config = Config::default();
    config.homepage.lazy_mode = LazyMode::Inline;
    let app = test_app(config).await;
    create(&app, json!({"name": "Hero", "type": "heroSlider", "ordering": 0})).await;
    create(&app, json!({"name": "Brands", "type": "brandGrid", "ordering": 1})).await;

    let (status, html) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("hx-get"));
    assert!(html.contains("data-section-type=\"brandGrid\""));
}

#[tokio::test]
async fn test_homepage_json() {
    let app = test_app(Config::default()).await;
    let (_, text) = send(&app, Method::GET, "/homepage", None).await;
    let empty: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(empty["status"], "noContent");

    create(&app, json!({"name": "Hero", "type": "heroSlider", "config": {"sliderIds": ["s1"]}})).await;
    let (status, text) = send(&app, Method::GET, "/homepage?mobile=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["status"], "done");
    assert_eq!(doc["body"][0]["slot"], "rendered");
    assert_eq!(doc["body"][0]["type"], "heroSlider");
}

#[tokio::test]
async fn test_clear_cache() {
    let app = test_app(Config::default()).await;
    let (status, text) = send(&app, Method::POST, "/cache/clear", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, r#"{"cleared":true}"#);
}
