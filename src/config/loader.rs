//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, ModelBackend};
use crate::domain::DurationSecs;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `MUSEGEN_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `MUSEGEN_SERVER__PORT=8080`
/// - `MUSEGEN_MODEL__BACKEND=fake`
/// - `MUSEGEN_MODEL__URL=http://gpu-box:8000`
/// - `MUSEGEN_STORAGE__TEMP_ROOT=/var/tmp/musegen`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8501)?
        .set_default("model.backend", "http")?
        .set_default("model.name", "facebook/musicgen-small")?
        .set_default("model.url", "http://localhost:8000")?
        .set_default("model.timeout_secs", 300)?
        .set_default("model.fake_channels", 1)?
        .set_default("generation.top_k", 250)?
        .set_default("generation.use_sampling", true)?
        .set_default("generation.default_duration_secs", DurationSecs::DEFAULT as i64)?
        .set_default("generation.max_duration_secs", DurationSecs::MAX as i64)?
        .set_default("storage.file_name", "audio_output.wav")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: MUSEGEN_MODEL__URL=http://gpu-box:8000
    builder = builder.add_source(
        Environment::with_prefix("MUSEGEN")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.model.name.is_empty() {
        return Err(ConfigError::ValidationError(
            "Model name cannot be empty".to_string(),
        ));
    }

    if config.model.backend == ModelBackend::Http && config.model.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Model URL cannot be empty for the http backend".to_string(),
        ));
    }

    if config.model.fake_channels == 0 {
        return Err(ConfigError::ValidationError(
            "Fake model channel count cannot be 0".to_string(),
        ));
    }

    if config.generation.top_k == 0 {
        return Err(ConfigError::ValidationError(
            "top_k cannot be 0".to_string(),
        ));
    }

    let generation = &config.generation;
    if generation.max_duration_secs == 0 || generation.max_duration_secs > DurationSecs::MAX {
        return Err(ConfigError::ValidationError(format!(
            "max_duration_secs must be within 1..={}",
            DurationSecs::MAX
        )));
    }

    if generation.default_duration_secs > generation.max_duration_secs {
        return Err(ConfigError::ValidationError(
            "default_duration_secs cannot exceed max_duration_secs".to_string(),
        ));
    }

    let file_name = &config.storage.file_name;
    if file_name.is_empty() || file_name.contains(|c: char| c == '/' || c == '\\') {
        return Err(ConfigError::ValidationError(format!(
            "Invalid output file name: {:?}",
            file_name
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("Model Backend: {}", config.model.backend);
    tracing::info!("Model Name: {}", config.model.name);
    if config.model.backend == ModelBackend::Http {
        tracing::info!("Model URL: {}", config.model.url);
        tracing::info!("Model Timeout: {}s", config.model.timeout_secs);
    }
    tracing::info!(
        "Sampling: use_sampling={}, top_k={}",
        config.generation.use_sampling,
        config.generation.top_k
    );
    tracing::info!(
        "Duration: default={}s, max={}s",
        config.generation.default_duration_secs,
        config.generation.max_duration_secs
    );
    match &config.storage.temp_root {
        Some(root) => tracing::info!("Temp Root: {:?}", root),
        None => tracing::info!("Temp Root: <system temp dir>"),
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
