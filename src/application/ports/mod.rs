//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_storage;
mod audio_probe;
mod music_model;

pub use artifact_storage::{ArtifactStoragePort, StorageError};
pub use audio_probe::{AudioInfo, AudioProbePort, ProbeError};
pub use music_model::{GenerationParams, ModelError, ModelLoaderPort, MusicModelPort};
