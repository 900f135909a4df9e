//! HTTP Music Model - 调用外部模型推理服务
//!
//! 实现 ModelLoaderPort / MusicModelPort，通过 HTTP 调用外部推理服务
//!
//! 外部推理 API:
//! POST {base}/api/models/load        {"name": "..."}  -> {"name": "...", "sample_rate": 32000}
//! POST {base}/api/musicgen/generate  {"model", "descriptions", "use_sampling", "top_k", "duration"}
//!      Response: little-endian f32 采样，形状在 `X-MusicGen-Shape` header 中（如 "1,1,320000"）
//! GET  {base}/health

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    GenerationParams, ModelError, ModelLoaderPort, MusicModelPort,
};
use crate::domain::{SampleBuffer, MODEL_SAMPLE_RATE};

/// 形状 header
pub const SHAPE_HEADER: &str = "X-MusicGen-Shape";

/// 模型加载请求体
#[derive(Debug, Serialize)]
struct LoadModelRequest<'a> {
    name: &'a str,
}

/// 模型加载响应体
#[derive(Debug, Deserialize)]
struct LoadModelResponse {
    name: String,
    #[serde(default)]
    sample_rate: Option<u32>,
}

/// 生成请求体
#[derive(Debug, Serialize)]
struct GenerateHttpRequest<'a> {
    model: &'a str,
    descriptions: &'a [String],
    use_sampling: bool,
    top_k: u32,
    duration: u32,
}

/// HTTP 模型客户端配置
#[derive(Debug, Clone)]
pub struct HttpMusicModelConfig {
    /// 推理服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpMusicModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 300,
        }
    }
}

impl HttpMusicModelConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn map_send_error(e: reqwest::Error) -> ModelError {
    if e.is_timeout() {
        ModelError::Timeout
    } else if e.is_connect() {
        ModelError::NetworkError(format!("Cannot connect to model service: {}", e))
    } else {
        ModelError::NetworkError(e.to_string())
    }
}

/// 解析形状 header，如 "1,1,320000"
fn parse_shape(value: &str) -> Result<Vec<usize>, ModelError> {
    value
        .split(',')
        .map(|dim| {
            dim.trim().parse::<usize>().map_err(|_| {
                ModelError::InvalidResponse(format!("Invalid shape header: {}", value))
            })
        })
        .collect()
}

/// 将 little-endian f32 字节流转换为采样
fn decode_f32_le(bytes: &[u8]) -> Result<Vec<f32>, ModelError> {
    if bytes.len() % 4 != 0 {
        return Err(ModelError::InvalidResponse(format!(
            "Sample payload length {} is not a multiple of 4",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// HTTP 模型加载器
pub struct HttpModelLoader {
    client: Client,
    config: HttpMusicModelConfig,
}

impl HttpModelLoader {
    pub fn new(config: HttpMusicModelConfig) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ModelLoaderPort for HttpModelLoader {
    async fn load(&self, name: &str) -> Result<Arc<dyn MusicModelPort>, ModelError> {
        let url = self.config.url("/api/models/load");
        tracing::debug!(url = %url, model = %name, "Requesting model load");

        let response = self
            .client
            .post(&url)
            .json(&LoadModelRequest { name })
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ModelError::LoadFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let loaded: LoadModelResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("Invalid load response: {}", e)))?;

        let sample_rate = loaded.sample_rate.unwrap_or(MODEL_SAMPLE_RATE);

        Ok(Arc::new(HttpMusicModel {
            client: self.client.clone(),
            config: self.config.clone(),
            name: loaded.name,
            sample_rate,
        }))
    }
}

/// HTTP 模型句柄
pub struct HttpMusicModel {
    client: Client,
    config: HttpMusicModelConfig,
    name: String,
    sample_rate: u32,
}

#[async_trait]
impl MusicModelPort for HttpMusicModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    async fn generate(
        &self,
        descriptions: &[String],
        params: &GenerationParams,
    ) -> Result<SampleBuffer, ModelError> {
        let body = GenerateHttpRequest {
            model: &self.name,
            descriptions,
            use_sampling: params.use_sampling,
            top_k: params.top_k,
            duration: params.duration_secs,
        };

        let url = self.config.url("/api/musicgen/generate");
        tracing::debug!(
            url = %url,
            batch = descriptions.len(),
            duration = params.duration_secs,
            "Sending generation request"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ModelError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let shape = response
            .headers()
            .get(SHAPE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ModelError::InvalidResponse(format!("Missing {} header", SHAPE_HEADER))
            })
            .and_then(parse_shape)?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("Failed to read samples: {}", e)))?;
        let data = decode_f32_le(&bytes)?;

        tracing::info!(
            model = %self.name,
            ?shape,
            payload_size = bytes.len(),
            "Generation completed"
        );

        SampleBuffer::new(shape, data).map_err(|e| ModelError::InvalidResponse(e.to_string()))
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.config.url("/health"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
