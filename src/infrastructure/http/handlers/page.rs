//! Page Handler - 单页界面
//!
//! 描述非空且时长非零时才运行生成流水线，否则只渲染表单

use axum::{
    extract::{Query, State},
    response::Html,
};
use std::sync::Arc;

use crate::application::PipelineOutcome;
use crate::domain::GenerationRequest;
use crate::infrastructure::http::dto::PageQuery;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::view::{render_page, PageResult, PageView};

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, ApiError> {
    let description = query.description.unwrap_or_default();
    let duration = query
        .duration
        .unwrap_or(state.page.default_duration as i64);

    let mut view = PageView {
        description: description.clone(),
        duration: duration.clamp(0, state.page.max_duration as i64) as u32,
        max_duration: state.page.max_duration,
        model_name: state.orchestrator.model_name().to_string(),
        result: None,
    };

    if description.trim().is_empty() || duration == 0 {
        return Ok(Html(render_page(&view)));
    }

    let request = GenerationRequest::bounded(description, duration, state.page.max_duration)?;

    view.result = Some(match state.orchestrator.run(&request).await? {
        PipelineOutcome::Rendered(audio) => PageResult::Generated(audio),
        PipelineOutcome::Unavailable { load_error } => PageResult::Failed { load_error },
    });

    Ok(Html(render_page(&view)))
}
