//! Drill session endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use drill_core::{parse, Session, SpeechField};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/sessions
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>)> {
    let settings = req.settings(state.config.auto_speak);
    if !(0.0..=1.0).contains(&settings.fuzzy_threshold) {
        return Err(ApiError::BadRequest(
            "fuzzy_threshold must be between 0 and 1".to_string(),
        ));
    }
    if !(settings.speech_rate > 0.0) {
        return Err(ApiError::BadRequest(
            "speech_rate must be positive".to_string(),
        ));
    }

    let items = resolve_items(&state, req.source).await?;
    let session = Session::new(items, settings)?;
    let count = session.items().len();

    let (id, view) = state.sessions.insert(session).await;
    tracing::info!(session_id = %id, items = count, "Created session");

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/sessions/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let view = state.sessions.read(id, |active| active.view(id)).await?;
    Ok(Json(view))
}

/// DELETE /api/sessions/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.sessions.remove(id).await?;
    tracing::info!(session_id = %id, "Deleted session");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/sessions/:id/items
///
/// Keeps progress when the answers are unchanged, restarts otherwise.
pub async fn load_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(source): Json<ItemSource>,
) -> Result<Json<LoadItemsResponse>> {
    let items = resolve_items(&state, source).await?;

    let response = state
        .sessions
        .update(id, |active| {
            let reset = active.session.load_items(items)?;
            if reset {
                active.awaiting_advance = false;
            }
            Ok(LoadItemsResponse {
                reset,
                current: active.view(id),
            })
        })
        .await?;

    tracing::info!(session_id = %id, reset = response.reset, "Loaded items");
    Ok(Json(response))
}

/// POST /api/sessions/:id/answer
pub async fn answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<FeedbackResponse>> {
    let feedback = state
        .sessions
        .update(id, |active| {
            active.ensure_can_answer()?;
            let feedback = active.session.submit_answer(&req.input);
            active.awaiting_advance = true;
            Ok(feedback)
        })
        .await?;

    tracing::debug!(session_id = %id, result = ?feedback.result, "Answer submitted");
    Ok(Json(FeedbackResponse {
        message: feedback.message(),
        feedback,
    }))
}

/// POST /api/sessions/:id/skip
pub async fn skip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedbackResponse>> {
    let feedback = state
        .sessions
        .update(id, |active| {
            active.ensure_can_answer()?;
            let feedback = active.session.skip();
            active.awaiting_advance = true;
            Ok(feedback)
        })
        .await?;

    tracing::debug!(session_id = %id, "Item skipped");
    Ok(Json(FeedbackResponse {
        message: feedback.message(),
        feedback,
    }))
}

/// POST /api/sessions/:id/advance
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdvanceResponse>> {
    let response = state
        .sessions
        .update(id, |active| {
            active.ensure_can_advance()?;
            let signals = active.session.advance();
            active.awaiting_advance = false;
            Ok(AdvanceResponse {
                signals: signals
                    .into_iter()
                    .map(|signal| SignalView {
                        message: signal.message(),
                        signal,
                    })
                    .collect(),
                current: active.view(id),
            })
        })
        .await?;

    for signal in &response.signals {
        tracing::info!(session_id = %id, "{}", signal.message);
    }
    Ok(Json(response))
}

/// GET /api/sessions/:id/stats
pub async fn stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatsResponse>> {
    let response = state
        .sessions
        .read(id, |active| StatsResponse {
            progress: active.session.progress(),
            wrong_queue: active.session.wrong_queue(),
            items: active.session.item_reports(),
        })
        .await?;
    Ok(Json(response))
}

/// GET /api/sessions/:id/history
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>> {
    let response = state
        .sessions
        .read(id, |active| {
            let history = active.session.history();
            let limit = query.limit.unwrap_or(history.len());
            HistoryResponse {
                entries: history.iter().rev().take(limit).cloned().collect(),
                total: history.len(),
            }
        })
        .await?;
    Ok(Json(response))
}

/// GET /api/sessions/:id/speech/:field
pub async fn speech(
    State(state): State<AppState>,
    Path((id, field)): Path<(Uuid, String)>,
) -> Result<Json<Utterance>> {
    let speech_field = SpeechField::from_str(&field)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown speech field: {}", field)))?;

    let utterance = state
        .sessions
        .read(id, |active| active.session.utterance(speech_field))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Current item has no {}", field)))?;

    Ok(Json(utterance))
}

/// Pick the items out of a request. Exactly one source must be given.
async fn resolve_items(state: &AppState, source: ItemSource) -> Result<Vec<QuizItem>> {
    match (source.items, source.content, source.word_list) {
        (Some(items), None, None) => Ok(items),
        (None, Some(content), None) => Ok(parse(&content)?),
        (None, None, Some(name)) => state.word_lists.load(&name).await,
        _ => Err(ApiError::BadRequest(
            "Provide exactly one of items, content or word_list".to_string(),
        )),
    }
}
