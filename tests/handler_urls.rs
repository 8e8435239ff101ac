mod common;

use serde_json::json;

#[tokio::test]
async fn test_create_url_uses_detected_pattern() {
    let (state, _rx) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({ "url": "https://github.com/rust-lang/rust" }))
        .await;

    assert_eq!(response.status_code(), 201);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["slug"], "github.rust-lang.rust");
    assert_eq!(json["destinationUrl"], "https://github.com/rust-lang/rust");
    assert_eq!(json["shortUrl"], "https://s.example.com/github.rust-lang.rust");
    assert_eq!(json["isActive"], true);
    assert_eq!(json["clickCount"], 0);
}

#[tokio::test]
async fn test_create_url_suffixes_taken_generated_slug() {
    let (state, _rx) = common::create_test_state();
    let server = common::test_server(state);

    let body = json!({ "url": "https://github.com/rust-lang/rust" });

    let first = server.post("/api/urls").json(&body).await;
    let second = server.post("/api/urls").json(&body).await;

    assert_eq!(first.status_code(), 201);
    assert_eq!(second.status_code(), 201);
    assert_eq!(
        second.json::<serde_json::Value>()["slug"],
        "github.rust-lang.rust.2"
    );
}

#[tokio::test]
async fn test_create_url_skips_reserved_generated_slug() {
    let (state, _rx) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({ "url": "https://example.com/clinic", "keywords": ["health"] }))
        .await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(response.json::<serde_json::Value>()["slug"], "health.2");

    let redirect = server.get("/health.2").await;
    assert_eq!(redirect.status_code(), 307);
    assert_eq!(redirect.header("location"), "https://example.com/clinic");
}

#[tokio::test]
async fn test_create_url_with_custom_slug() {
    let (state, _rx) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({
            "url": "https://example.com/docs",
            "customSlug": "My.Docs",
            "keywords": ["docs"],
            "clickLimit": 5
        }))
        .await;

    assert_eq!(response.status_code(), 201);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["slug"], "my.docs");
    assert_eq!(json["keywords"], json!(["docs"]));
    assert_eq!(json["clickLimit"], 5);
}

#[tokio::test]
async fn test_create_url_custom_slug_taken() {
    let (state, _rx) = common::create_test_state();
    common::create_test_link(&state, "docs", "https://example.com/a").await;
    let server = common::test_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({ "url": "https://example.com/b", "customSlug": "docs" }))
        .await;

    assert_eq!(response.status_code(), 409);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "slug_taken");
    assert_eq!(json["error"]["details"]["slug"], "docs");
}

#[tokio::test]
async fn test_create_url_rejects_bad_url() {
    let (state, _rx) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({ "url": "javascript:alert(1)" }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "invalid_url"
    );
}

#[tokio::test]
async fn test_create_url_rejects_zero_click_limit() {
    let (state, _rx) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({ "url": "https://example.com", "clickLimit": 0 }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "validation_error"
    );
}

#[tokio::test]
async fn test_get_url() {
    let (state, _rx) = common::create_test_state();
    common::create_test_link(&state, "docs", "https://example.com/docs").await;
    let server = common::test_server(state);

    let response = server.get("/api/urls/docs").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["slug"], "docs");
    assert_eq!(json["destinationUrl"], "https://example.com/docs");
}

#[tokio::test]
async fn test_get_url_not_found() {
    let (state, _rx) = common::create_test_state();
    let server = common::test_server(state);

    let response = server.get("/api/urls/missing").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "not_found"
    );
}

#[tokio::test]
async fn test_list_urls_skips_inactive() {
    let (state, _rx) = common::create_test_state();
    common::create_test_link(&state, "first", "https://example.com/1").await;
    common::create_test_link(&state, "second", "https://example.com/2").await;
    state.link_service.deactivate("first").await.unwrap();
    let server = common::test_server(state);

    let response = server.get("/api/urls").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["count"], 1);
    assert_eq!(json["urls"][0]["slug"], "second");
}

#[tokio::test]
async fn test_update_url_changes_destination() {
    let (state, _rx) = common::create_test_state();
    common::create_test_link(&state, "docs", "https://example.com/old").await;
    let server = common::test_server(state);

    let response = server
        .patch("/api/urls/docs")
        .json(&json!({ "url": "https://example.com/new", "clickLimit": 10 }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["destinationUrl"], "https://example.com/new");
    assert_eq!(json["clickLimit"], 10);

    let redirect = server.get("/docs").await;
    assert_eq!(redirect.header("location"), "https://example.com/new");
}

#[tokio::test]
async fn test_update_url_clears_click_limit() {
    let (state, _rx) = common::create_test_state();
    common::create_limited_link(&state, "docs", "https://example.com", 3).await;
    let server = common::test_server(state);

    let response = server
        .patch("/api/urls/docs")
        .json(&json!({ "clickLimit": null }))
        .await;

    response.assert_status_ok();
    assert!(response.json::<serde_json::Value>()["clickLimit"].is_null());
}

#[tokio::test]
async fn test_update_url_empty_body_rejected() {
    let (state, _rx) = common::create_test_state();
    common::create_test_link(&state, "docs", "https://example.com").await;
    let server = common::test_server(state);

    let response = server.patch("/api/urls/docs").json(&json!({})).await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_delete_url_deactivates_and_keeps_slug_reserved() {
    let (state, _rx) = common::create_test_state();
    common::create_test_link(&state, "docs", "https://example.com").await;
    let server = common::test_server(state);

    let response = server.delete("/api/urls/docs").await;
    assert_eq!(response.status_code(), 204);

    let redirect = server.get("/docs").await;
    assert_eq!(redirect.status_code(), 404);

    let reuse = server
        .post("/api/urls")
        .json(&json!({ "url": "https://example.com/other", "customSlug": "docs" }))
        .await;
    assert_eq!(reuse.status_code(), 409);
}

#[tokio::test]
async fn test_delete_url_not_found() {
    let (state, _rx) = common::create_test_state();
    let server = common::test_server(state);

    let response = server.delete("/api/urls/missing").await;

    assert_eq!(response.status_code(), 404);
}
