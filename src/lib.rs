//! musegen - 文本生成音乐的单页应用
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Music Context: 生成请求、采样缓冲区
//!
//! 应用层 (application/):
//! - Ports: MusicModel、ModelLoader、ArtifactStorage、AudioProbe
//! - ModelRegistry: 进程级懒加载模型单例
//! - SessionOrchestrator: load_model → generate → persist → render
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 单页界面 + JSON API
//! - Adapters: HTTP/Fake 模型后端、临时 WAV 存储、WAV 信息读取

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
