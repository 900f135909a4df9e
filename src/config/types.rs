//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 模型后端配置
    #[serde(default)]
    pub model: ModelConfig,

    /// 生成参数配置
    #[serde(default)]
    pub generation: GenerationConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 模型后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// 外部 HTTP 推理服务
    #[default]
    Http,
    /// 本地正弦音生成（开发/测试）
    Fake,
}

impl std::fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelBackend::Http => write!(f, "http"),
            ModelBackend::Fake => write!(f, "fake"),
        }
    }
}

/// 模型后端配置
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// 后端类型
    #[serde(default)]
    pub backend: ModelBackend,

    /// 预训练模型名称
    #[serde(default = "default_model_name")]
    pub name: String,

    /// 推理服务基础 URL
    #[serde(default = "default_model_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,

    /// Fake 后端输出声道数
    #[serde(default = "default_fake_channels")]
    pub fake_channels: usize,
}

fn default_model_name() -> String {
    "facebook/musicgen-small".to_string()
}

fn default_model_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_model_timeout() -> u64 {
    300 // 20 秒音频在 CPU 上可能需要数分钟
}

fn default_fake_channels() -> usize {
    1
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::default(),
            name: default_model_name(),
            url: default_model_url(),
            timeout_secs: default_model_timeout(),
            fake_channels: default_fake_channels(),
        }
    }
}

/// 生成参数配置
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// top-k 候选数量
    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// 是否启用随机采样
    #[serde(default = "default_use_sampling")]
    pub use_sampling: bool,

    /// 页面滑块默认时长（秒）
    #[serde(default = "default_duration")]
    pub default_duration_secs: u32,

    /// 时长上限（秒），不超过 20
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: u32,
}

fn default_top_k() -> u32 {
    250
}

fn default_use_sampling() -> bool {
    true
}

fn default_duration() -> u32 {
    10
}

fn default_max_duration() -> u32 {
    20
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            use_sampling: default_use_sampling(),
            default_duration_secs: default_duration(),
            max_duration_secs: default_max_duration(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 临时目录根，未设置时使用系统临时目录
    #[serde(default)]
    pub temp_root: Option<PathBuf>,

    /// 输出文件名
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    "audio_output.wav".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_root: None,
            file_name: default_file_name(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.model.backend, ModelBackend::Http);
        assert_eq!(config.model.name, "facebook/musicgen-small");
        assert_eq!(config.generation.top_k, 250);
        assert!(config.generation.use_sampling);
        assert_eq!(config.storage.file_name, "audio_output.wav");
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8501");
        assert_eq!(config.public_base_url(), "http://localhost:8501");
    }
}
