//! Application State

use std::sync::Arc;

use crate::application::SessionOrchestrator;

/// 页面设置
#[derive(Debug, Clone)]
pub struct PageSettings {
    /// 滑块默认时长（秒）
    pub default_duration: u32,
    /// 滑块上限（秒）
    pub max_duration: u32,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            default_duration: 10,
            max_duration: 20,
        }
    }
}

/// 应用状态
///
/// 请求之间唯一共享的可变资源是编排器内部缓存的模型句柄
pub struct AppState {
    pub orchestrator: Arc<SessionOrchestrator>,
    pub page: PageSettings,
}

impl AppState {
    pub fn new(orchestrator: Arc<SessionOrchestrator>, page: PageSettings) -> Self {
        Self { orchestrator, page }
    }
}
