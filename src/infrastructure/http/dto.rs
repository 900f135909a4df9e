//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::RenderedAudio;

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 页面查询参数（表单以 GET 提交）
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub description: Option<String>,
    pub duration: Option<i64>,
}

/// 生成请求
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub description: String,
    pub duration: i64,
}

/// 生成结果
#[derive(Debug, Serialize)]
pub struct GeneratedAudioResponse {
    pub file_name: String,
    pub path: String,
    pub size: usize,
    pub content_type: &'static str,
    pub sample_rate: u32,
    pub channels: u8,
    pub duration_ms: u64,
    pub download_href: String,
}

impl From<RenderedAudio> for GeneratedAudioResponse {
    fn from(audio: RenderedAudio) -> Self {
        Self {
            file_name: audio.file_name,
            path: audio.path.display().to_string(),
            size: audio.bytes.len(),
            content_type: audio.content_type,
            sample_rate: audio.info.sample_rate,
            channels: audio.info.channels,
            duration_ms: audio.info.duration_ms,
            download_href: audio.download_href,
        }
    }
}
