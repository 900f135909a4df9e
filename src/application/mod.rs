//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（MusicModel、ModelLoader、ArtifactStorage、AudioProbe）
//! - model_registry: 进程级模型单例
//! - orchestrator: 单次生成流水线
//! - render: 播放/下载表示
//! - error: 应用层错误定义

pub mod error;
pub mod model_registry;
pub mod orchestrator;
pub mod ports;
pub mod render;

pub use error::ApplicationError;
pub use model_registry::{ModelRegistry, ModelStatus};
pub use orchestrator::{OrchestratorConfig, PipelineOutcome, SessionOrchestrator};
pub use render::RenderedAudio;

pub use ports::{
    ArtifactStoragePort, AudioInfo, AudioProbePort, GenerationParams, ModelError,
    ModelLoaderPort, MusicModelPort, ProbeError, StorageError,
};
