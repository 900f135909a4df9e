//! Ping Handler - 健康检查

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// 模型是否已就绪（未加载时不会触发加载）
    pub model_ready: bool,
    /// 模型后端健康检查结果，模型未就绪时为 null
    pub backend_healthy: Option<bool>,
}

pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    let backend_healthy = state.orchestrator.backend_healthy().await;

    Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model_ready: backend_healthy.is_some(),
        backend_healthy,
    })
}
