//! Audio Probe Port - 读取已写入音频的元信息

use serde::Serialize;
use thiserror::Error;

/// 解析错误
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),
}

/// 音频信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioInfo {
    /// 采样率
    pub sample_rate: u32,
    /// 声道数
    pub channels: u8,
    /// 每声道帧数
    pub frames: u64,
    /// 时长（毫秒）
    pub duration_ms: u64,
}

/// Audio Probe Port
pub trait AudioProbePort: Send + Sync {
    fn probe(&self, wav_data: &[u8]) -> Result<AudioInfo, ProbeError>;
}
