//! Word list endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/word-lists
pub async fn list(State(state): State<AppState>) -> Result<Json<WordListsResponse>> {
    let word_lists = state.word_lists.list().await?;
    Ok(Json(WordListsResponse { word_lists }))
}
