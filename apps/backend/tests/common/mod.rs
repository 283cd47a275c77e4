//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext with a router over a throwaway word list directory
//! - Helpers for driving a session through the HTTP API

pub mod fixtures;

use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use vocab_drill_backend::config::Config;
use vocab_drill_backend::{build_router, AppState};

/// Test context owning the word list directory and the app state.
pub struct TestContext {
    pub state: AppState,
    _word_lists: TempDir,
}

impl TestContext {
    /// Create a context with the sample word lists.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a context, adjusting the config before the state is built.
    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create word list dir");
        for (name, content) in fixtures::word_list_files() {
            std::fs::write(dir.path().join(name), content).expect("Failed to write word list");
        }

        let mut config = Config {
            word_list_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        adjust(&mut config);

        Self {
            state: AppState::new(config),
            _word_lists: dir,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }
}

/// Create a session from inline answers and return its id.
pub async fn create_session(server: &TestServer, answers: &[&str]) -> String {
    let response = server
        .post("/api/sessions")
        .json(&fixtures::create_request(answers))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    body["session_id"].as_str().unwrap().to_string()
}

/// Submit an answer and advance, returning `(feedback, advance)` bodies.
pub async fn answer_and_advance(server: &TestServer, id: &str, input: &str) -> (Value, Value) {
    let feedback = server
        .post(&format!("/api/sessions/{}/answer", id))
        .json(&json!({ "input": input }))
        .await;
    feedback.assert_status_ok();

    let advance = server
        .post(&format!("/api/sessions/{}/advance", id))
        .await;
    advance.assert_status_ok();

    (feedback.json(), advance.json())
}
