//! Artifact Storage Port - 出站端口
//!
//! 生成结果写入临时 WAV 文件，并读回给页面播放/下载

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{AudioError, NormalizedAudio};

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("WAV encoding error: {0}")]
    EncodingError(String),

    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// Artifact Storage Port
#[async_trait]
pub trait ArtifactStoragePort: Send + Sync {
    /// 在新分配的唯一临时目录下写入第一个批次元素，返回文件路径
    ///
    /// 不负责清理
    async fn persist(
        &self,
        audio: &NormalizedAudio,
        sample_rate: u32,
    ) -> Result<PathBuf, StorageError>;

    /// 完整读取文件内容
    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError>;
}
