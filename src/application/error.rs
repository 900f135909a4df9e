//! 应用层错误定义

use thiserror::Error;

use crate::application::ports::{ModelError, ProbeError, StorageError};
use crate::domain::AudioError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<AudioError> for ApplicationError {
    fn from(err: AudioError) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<ModelError> for ApplicationError {
    fn from(err: ModelError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<StorageError> for ApplicationError {
    fn from(err: StorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<ProbeError> for ApplicationError {
    fn from(err: ProbeError) -> Self {
        Self::InternalError(err.to_string())
    }
}
