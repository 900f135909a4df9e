//! Music Model Port - 文本生成音乐模型抽象
//!
//! 模型本身是外部黑盒，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::SampleBuffer;

/// 模型错误
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model load failed: {0}")]
    LoadFailed(String),
}

/// 采样超参数
///
/// 每次生成调用单独传入，不修改共享的模型句柄
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// 是否启用随机采样
    pub use_sampling: bool,
    /// top-k 候选数量
    pub top_k: u32,
    /// 目标时长（秒）
    pub duration_secs: u32,
}

impl GenerationParams {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            ..Default::default()
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            use_sampling: true,
            top_k: 250,
            duration_secs: 10,
        }
    }
}

/// Music Model Port
///
/// 已加载的预训练模型句柄
#[async_trait]
pub trait MusicModelPort: Send + Sync {
    /// 模型名称（如 `facebook/musicgen-small`）
    fn name(&self) -> &str;

    /// 模型输出采样率
    fn sample_rate(&self) -> u32;

    /// 为一批描述生成音频
    ///
    /// 返回批次张量，形状通常为 (batch, channels, frames)
    async fn generate(
        &self,
        descriptions: &[String],
        params: &GenerationParams,
    ) -> Result<SampleBuffer, ModelError>;

    /// 检查模型后端是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}

/// Model Loader Port
///
/// 按名称加载预训练模型
#[async_trait]
pub trait ModelLoaderPort: Send + Sync {
    async fn load(&self, name: &str) -> Result<Arc<dyn MusicModelPort>, ModelError>;
}
