//! End-to-end tests for cover generation
//!
//! Tests offline placeholders, partial failures and the analyze-to-covers flow.

mod common;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use common::{
    fake_mp3_bytes, FakeBackend, TestClient, TestServer, PLACEHOLDER_PNG_BASE64,
    PROMPT_MARKER_ARTISTIC, PROMPT_MARKER_COLORFUL, TITLE_ARTISTIC, TITLE_COLORFUL, TITLE_GENRE,
    TITLE_MINIMAL,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

fn sample_analysis() -> Value {
    json!({
        "topic": "How small teams ship fast",
        "mood": "energetic",
        "genre": "business",
        "audience": "Startup founders",
        "keywords": ["shipping", "teams", "velocity"]
    })
}

fn titles(body: &Value) -> Vec<String> {
    body["covers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|cover| cover["title"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Offline Mode
// =============================================================================

#[tokio::test]
async fn test_offline_returns_three_placeholder_covers() {
    let server = TestServer::spawn_offline().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.generate_covers(&sample_analysis()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(titles(&body), vec![TITLE_MINIMAL, TITLE_COLORFUL, TITLE_ARTISTIC]);

    let expected_png = BASE64.decode(PLACEHOLDER_PNG_BASE64).unwrap();
    for cover in body["covers"].as_array().unwrap() {
        let image = cover["image"].as_str().unwrap();
        assert_eq!(image, PLACEHOLDER_PNG_BASE64);
        assert_eq!(BASE64.decode(image).unwrap(), expected_png);
    }
}

#[tokio::test]
async fn test_offline_round_trip_never_misses_fields() {
    let server = TestServer::spawn_offline().await;
    let client = TestClient::new(server.base_url.clone());

    let analyze_body: Value = client
        .analyze("episode.mp3", Some("audio/mpeg"), fake_mp3_bytes(100))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(analyze_body["success"], true);

    let response = client.generate_covers(&analyze_body["analysis"]).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["covers"].as_array().unwrap().len(), 3);
}

// =============================================================================
// Live Mode
// =============================================================================

#[tokio::test]
async fn test_all_four_covers_in_template_order() {
    let backend = Arc::new(FakeBackend::with_analysis("unused"));
    let server = TestServer::spawn_live(backend.clone()).await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.generate_covers(&sample_analysis()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        titles(&body),
        vec![TITLE_MINIMAL, TITLE_COLORFUL, TITLE_ARTISTIC, TITLE_GENRE]
    );
    assert_eq!(backend.image_calls(), 4);

    // the fake returns the prompt as image bytes
    let first = BASE64
        .decode(body["covers"][0]["image"].as_str().unwrap())
        .unwrap();
    let prompt = String::from_utf8(first).unwrap();
    assert!(prompt.contains("Topic: How small teams ship fast"));
    assert!(prompt.ends_with("Keywords: shipping, teams, velocity"));
}

#[tokio::test]
async fn test_single_success_returns_one_cover() {
    let backend = Arc::new(
        FakeBackend::with_analysis("unused").images_succeeding_for(vec![PROMPT_MARKER_ARTISTIC]),
    );
    let server = TestServer::spawn_live(backend.clone()).await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.generate_covers(&sample_analysis()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(titles(&body), vec![TITLE_ARTISTIC]);
    assert_eq!(backend.image_calls(), 4);
}

#[tokio::test]
async fn test_partial_failure_keeps_order_of_successes() {
    let backend = Arc::new(
        FakeBackend::with_analysis("unused")
            .images_succeeding_for(vec![PROMPT_MARKER_ARTISTIC, PROMPT_MARKER_COLORFUL]),
    );
    let server = TestServer::spawn_live(backend).await;
    let client = TestClient::new(server.base_url.clone());

    let body: Value = client
        .generate_covers(&sample_analysis())
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(titles(&body), vec![TITLE_COLORFUL, TITLE_ARTISTIC]);
}

#[tokio::test]
async fn test_all_failures_is_an_error() {
    let backend =
        Arc::new(FakeBackend::with_analysis("unused").images_succeeding_for(Vec::new()));
    let server = TestServer::spawn_live(backend.clone()).await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.generate_covers(&sample_analysis()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No images generated");
    assert_eq!(body["code"], "no_images");
    assert!(body.get("covers").is_none());
    assert_eq!(backend.image_calls(), 4);
}

#[tokio::test]
async fn test_live_round_trip() {
    let backend = Arc::new(FakeBackend::with_analysis("Founders talk money"));
    let server = TestServer::spawn_live(backend).await;
    let client = TestClient::new(server.base_url.clone());

    let analyze_body: Value = client
        .analyze("episode.mp3", Some("audio/mpeg"), fake_mp3_bytes(100))
        .await
        .json()
        .await
        .unwrap();
    let response = client.generate_covers(&analyze_body["analysis"]).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["covers"].as_array().unwrap().len(), 4);
}

// =============================================================================
// Request Validation
// =============================================================================

#[tokio::test]
async fn test_missing_topic_is_rejected() {
    let backend = Arc::new(FakeBackend::with_analysis("unused"));
    let server = TestServer::spawn_live(backend.clone()).await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .generate_covers(&json!({ "mood": "calm", "genre": "news" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing analysis data");
    assert_eq!(body["code"], "missing_analysis");
    assert_eq!(backend.image_calls(), 0);
}

#[tokio::test]
async fn test_topic_only_body_uses_defaults() {
    let backend = Arc::new(FakeBackend::with_analysis("unused"));
    let server = TestServer::spawn_live(backend).await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.generate_covers(&json!({ "topic": "Gardening" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let genre_prompt = BASE64
        .decode(body["covers"][3]["image"].as_str().unwrap())
        .unwrap();
    assert_eq!(
        String::from_utf8(genre_prompt).unwrap(),
        "Create a 1:1 2K cover according to genre: , Mood: , Keywords: "
    );
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let server = TestServer::spawn_offline().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.generate_covers_raw("{\"topic\": ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_body");
}
