//! HTTP Routes
//!
//! Endpoints:
//! - /                    GET   单页界面（description、duration 为查询参数）
//! - /api/ping            GET   健康检查
//! - /api/generate        POST  生成音乐（JSON）
//! - /api/model/status    GET   模型单例状态

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::index))
        .nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/generate", post(handlers::generate))
        .route("/model/status", get(handlers::model_status))
}
