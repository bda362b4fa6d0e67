//! In-process HTTP tests of the API router (in-memory storage)

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use biblio_server::{
    api,
    config::{AppConfig, StorageBackend},
    repository::Repository,
    services::Services,
    AppState,
};

async fn app() -> Router {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    let services = Services::new(Repository::in_memory(), &config.catalog)
        .await
        .expect("in-memory services");
    api::router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (_, body) = send(&app, Method::GET, "/api/v1/ready", None).await;
    assert_eq!(body["status"], "ready");
    assert!(body["field_definitions"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_field_definition_lookup() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/field-definitions/data/200", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tag"], "200");
    assert_eq!(body["subFieldDef"][0]["code"], "a");
    assert_eq!(body["subFieldDef"][0]["mandatory"], true);

    let (status, body) = send(&app, Method::GET, "/api/v1/field-definitions/control/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 20);

    let (_, body) = send(&app, Method::GET, "/api/v1/field-definitions/control", None).await;
    let tags: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["tag"].as_str())
        .collect();
    assert_eq!(tags.first(), Some(&"001"));
}

#[tokio::test]
async fn test_template_lifecycle() {
    let app = app().await;
    let request = json!({
        "name": "Livro Padrão",
        "controlFieldTags": ["001"],
        "dataFieldTags": ["200"]
    });

    let (status, template) = send(&app, Method::POST, "/api/v1/templates", Some(request.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(template["controlFields"][0]["definition"]["tag"], "001");
    assert_eq!(template["dataFields"][0]["definition"]["tag"], "200");

    let (status, body) = send(&app, Method::POST, "/api/v1/templates", Some(request)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8);

    let uri = format!("/api/v1/templates/{}/scaffold", template["id"]);
    let (status, draft) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["dataFields"][0]["ind1"], " ");
    assert_eq!(draft["dataFields"][0]["subFields"], json!([{ "code": "a", "value": "" }]));
    assert!(draft.get("id").is_none());
}

#[tokio::test]
async fn test_unknown_tags_are_all_reported() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/templates",
        Some(json!({ "name": "X", "controlFieldTags": ["999"], "dataFieldTags": ["998", "200"] })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 22);
    assert_eq!(body["details"]["unknownTags"], json!(["999", "998"]));

    let (_, templates) = send(&app, Method::GET, "/api/v1/templates", None).await;
    assert_eq!(templates, json!([]));
}

#[tokio::test]
async fn test_validate_field_reports_violations() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/records/validate-field",
        Some(json!({
            "field": {
                "tag": "700", "ind1": " ", "ind2": "1",
                "subFields": [{ "code": "b", "value": "Jo" }, { "code": "b", "value": "J." }]
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 23);
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert!(details.iter().any(|v| v["code"] == "a"));
    assert!(details.iter().any(|v| v["code"] == "b"));
}

#[tokio::test]
async fn test_record_display_and_summary() {
    let app = app().await;
    let (status, record) = send(
        &app,
        Method::POST,
        "/api/v1/records",
        Some(json!({
            "controlFields": [{ "tag": "001", "value": "REC-1" }],
            "dataFields": [
                { "tag": "200", "ind1": "1", "ind2": "#",
                  "subFields": [{ "code": "a", "value": "A Casa da Noite /" }, { "code": "f", "value": "Jo Nesbø" }] },
                { "tag": "210", "ind1": " ", "ind2": " ",
                  "subFields": [{ "code": "d", "value": "cop. 2012" }] }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = record["id"].as_i64().unwrap();

    let (_, summary) = send(&app, Method::GET, &format!("/api/v1/records/{}/summary", id), None).await;
    assert_eq!(summary, json!({ "title": "A Casa da Noite", "author": "Jo Nesbø", "year": "2012" }));

    let (_, display) = send(&app, Method::GET, &format!("/api/v1/records/{}/display", id), None).await;
    let subfields = &display["dataFields"][0]["subfields"];
    assert_eq!(subfields[1]["position"], "b");
    assert_eq!(subfields[1]["code"], "f");
    assert_eq!(display["dataFields"][0]["ind2"], "#");

    let (status, _) = send(&app, Method::GET, "/api/v1/records/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_extract_raw_metadata() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/unimarc/extract")
        .body(Body::from(
            "<dc:title>A Casa da Noite</dc:title><dc:creator>Nesbø, Jo</dc:creator>",
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let summary: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(summary["title"], "A Casa da Noite");
    assert!(summary["author"].as_str().unwrap().contains("Nesbø, Jo"));
    assert_eq!(summary["year"], "Ano desconhecido");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/unimarc/extract")
        .body(Body::from("just some words"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_record_listing_past_the_last_page() {
    let app = app().await;
    let (status, _) = send(&app, Method::POST, "/api/v1/records", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, page) = send(&app, Method::GET, "/api/v1/records?page=1&per_page=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.as_array().unwrap().len(), 1);

    let (status, page) =
        send(&app, Method::GET, "/api/v1/records?page=9223372036854775807&per_page=50", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, json!([]));
}
