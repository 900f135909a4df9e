//! Model Handlers

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::application::ModelStatus;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    pub model: String,
    #[serde(flatten)]
    pub status: ModelStatus,
}

/// 查询模型单例状态（不会触发加载）
pub async fn model_status(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<ModelStatusResponse>> {
    Json(ApiResponse::success(ModelStatusResponse {
        model: state.orchestrator.model_name().to_string(),
        status: state.orchestrator.model_status(),
    }))
}
