//! Generate Handler - JSON API

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::PipelineOutcome;
use crate::domain::GenerationRequest;
use crate::infrastructure::http::dto::{ApiResponse, GenerateRequest, GeneratedAudioResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::view::GENERATION_FAILED_MESSAGE;

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<ApiResponse<GeneratedAudioResponse>>, ApiError> {
    let request =
        GenerationRequest::bounded(req.description, req.duration, state.page.max_duration)?;

    match state.orchestrator.run(&request).await? {
        PipelineOutcome::Rendered(audio) => Ok(Json(ApiResponse::success(audio.into()))),
        PipelineOutcome::Unavailable { load_error } => Err(ApiError::ServiceUnavailable(
            load_error.unwrap_or_else(|| GENERATION_FAILED_MESSAGE.to_string()),
        )),
    }
}
