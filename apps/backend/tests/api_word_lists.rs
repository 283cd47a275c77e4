//! Word list API tests.

mod common;

use serde_json::{json, Value};

use common::TestContext;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_list_word_lists() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/word-lists").await;

    response.assert_status_ok();
    let body: Value = response.json();
    // broken.md fails to parse and is left out.
    assert_eq!(
        body["word_lists"],
        json!([
            { "name": "seasons", "item_count": 3 },
            { "name": "unit-10", "item_count": 3 }
        ])
    );
}

#[tokio::test]
async fn test_list_word_lists_missing_dir() {
    let ctx = TestContext::with_config(|config| {
        config.word_list_dir = "/nonexistent/word-lists".into();
    });
    let server = ctx.server();

    let response = server.get("/api/word-lists").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["word_lists"], json!([]));
}

#[tokio::test]
async fn test_bundled_word_lists() {
    let ctx = TestContext::with_config(|config| {
        config.word_list_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../word-lists").into();
    });
    let server = ctx.server();

    let body: Value = server.get("/api/word-lists").await.json();
    assert_eq!(
        body["word_lists"],
        json!([
            { "name": "chinese-u10", "item_count": 21 },
            { "name": "ela-p45", "item_count": 8 }
        ])
    );

    let created: Value = server
        .post("/api/sessions")
        .json(&json!({ "word_list": "ela-p45" }))
        .await
        .json();
    assert_eq!(created["cloze"], "Many people worked at the ____.");
}
