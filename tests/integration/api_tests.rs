//! API integration tests against a running server
//!
//! Run with: cargo test --test api_tests -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Template names must be unique across runs
fn unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_data_field_definitions() {
    let client = Client::new();

    let response = client
        .get(format!("{}/field-definitions/data", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let fields = body.as_array().expect("Expected an array");
    assert!(fields.iter().any(|f| f["tag"] == "200"));
    assert!(fields.iter().all(|f| f["subFieldDef"].is_array()));
}

#[tokio::test]
#[ignore]
async fn test_unknown_data_field_is_not_found() {
    let client = Client::new();

    let response = client
        .get(format!("{}/field-definitions/data/999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_create_template_and_duplicate() {
    let client = Client::new();
    let name = unique_name("Livro Padrão");

    let response = client
        .post(format!("{}/templates", BASE_URL))
        .json(&json!({
            "name": name,
            "controlFieldTags": ["001"],
            "dataFieldTags": ["200"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["controlFields"][0]["definition"]["tag"], "001");
    assert_eq!(body["dataFields"][0]["definition"]["tag"], "200");

    let response = client
        .post(format!("{}/templates", BASE_URL))
        .json(&json!({ "name": name, "dataFieldTags": ["200"] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_create_template_with_unknown_tag() {
    let client = Client::new();
    let name = unique_name("X");

    let response = client
        .post(format!("{}/templates", BASE_URL))
        .json(&json!({ "name": name, "controlFieldTags": ["999"] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["details"]["unknownTags"], json!(["999"]));

    let templates: Value = client
        .get(format!("{}/templates", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let templates = templates.as_array().expect("Expected an array");
    assert!(templates.iter().all(|t| t["name"] != name.as_str()));
}

#[tokio::test]
#[ignore]
async fn test_create_and_summarize_record() {
    let client = Client::new();

    let response = client
        .post(format!("{}/records", BASE_URL))
        .json(&json!({
            "controlFields": [{ "tag": "001", "value": "REC-1" }],
            "dataFields": [
                { "tag": "200", "ind1": "1", "ind2": " ",
                  "subFields": [{ "code": "a", "value": "A Casa da Noite" }] },
                { "tag": "700", "ind1": " ", "ind2": "1",
                  "subFields": [{ "code": "a", "value": "Nesbø" }, { "code": "b", "value": "Jo" }] }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let record: Value = response.json().await.expect("Failed to parse response");
    let id = record["id"].as_i64().expect("No id in response");

    let summary: Value = client
        .get(format!("{}/records/{}/summary", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(summary["title"], "A Casa da Noite");
    assert_eq!(summary["author"], "Nesbø, Jo");
    assert_eq!(summary["year"], "Ano desconhecido");
}

#[tokio::test]
#[ignore]
async fn test_extract_dublin_core() {
    let client = Client::new();

    let response = client
        .post(format!("{}/unimarc/extract", BASE_URL))
        .header("Content-Type", "application/xml")
        .body("<dc:title>A Casa da Noite</dc:title><dc:creator>Nesbø, Jo</dc:creator>")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "A Casa da Noite");
    assert_eq!(body["year"], "Ano desconhecido");
}
