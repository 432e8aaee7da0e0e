//! Answers API endpoints.

use std::collections::HashSet;

use axum::{extract::State, Json};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::ApiAnswers;
use crate::AppState;

/// GET /api/answers - Get the current answers.
pub async fn get_answers(State(state): State<AppState>) -> ApiResult<ApiAnswers> {
    simulate_latency(&state).await;

    let (answers, revision_id) = state.repo.get_answers().await;
    success(answers, revision_id)
}

/// PUT /api/answers - Replace the answers.
pub async fn update_answers(
    State(state): State<AppState>,
    Json(request): Json<ApiAnswers>,
) -> ApiResult<ApiAnswers> {
    simulate_latency(&state).await;

    if let Err(e) = validate_interest_ids(&request) {
        let revision_id = state.repo.get_revision_id().await;
        return error(e, revision_id);
    }

    let (answers, revision_id) = state.repo.update_answers(request).await;
    tracing::info!(revision_id, "Answers updated");
    success(answers, revision_id)
}

/// DELETE /api/answers - Reset the answers to their defaults.
pub async fn reset_answers(State(state): State<AppState>) -> ApiResult<ApiAnswers> {
    simulate_latency(&state).await;

    let (answers, revision_id) = state.repo.reset_answers().await;
    tracing::info!(revision_id, "Answers reset");
    success(answers, revision_id)
}

async fn simulate_latency(state: &AppState) {
    if !state.config.api_delay.is_zero() {
        tokio::time::sleep(state.config.api_delay).await;
    }
}

fn validate_interest_ids(answers: &ApiAnswers) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for interest in &answers.interests {
        if interest.id.trim().is_empty() {
            return Err(AppError::Validation(
                "Interest id must not be empty".to_string(),
            ));
        }
        if !seen.insert(interest.id.as_str()) {
            return Err(AppError::Validation(format!(
                "Duplicate interest id {}",
                interest.id
            )));
        }
    }
    Ok(())
}
