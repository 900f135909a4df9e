//! Music Context - Errors

use thiserror::Error;

/// 生成请求错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("描述不能为空")]
    EmptyDescription,

    #[error("时长超出范围: {value}s (允许 {min}..={max})")]
    DurationOutOfRange { value: i64, min: u32, max: u32 },
}

/// 采样缓冲区错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AudioError {
    #[error("无效的张量形状: {0:?} (需要 2 维或 3 维)")]
    InvalidShape(Vec<usize>),

    #[error("数据长度与形状不匹配: shape={shape:?}, len={len}")]
    LengthMismatch { shape: Vec<usize>, len: usize },

    #[error("张量形状过大: {0:?}")]
    ShapeOverflow(Vec<usize>),

    #[error("批次为空")]
    EmptyBatch,
}
