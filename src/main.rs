//! musegen - 文本生成音乐服务入口

use std::sync::Arc;

use musegen::application::ports::ModelLoaderPort;
use musegen::application::{ModelRegistry, OrchestratorConfig, SessionOrchestrator};
use musegen::config::{load_config, print_config, AppConfig, ModelBackend};
use musegen::infrastructure::adapters::{
    FakeModelLoader, FakeMusicModelConfig, HttpModelLoader, HttpMusicModelConfig,
    TempWavStorage, WavProbe,
};
use musegen::infrastructure::http::{AppState, HttpServer, PageSettings};

/// 初始化日志（RUST_LOG 优先于配置文件）
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},musegen={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 根据配置创建模型加载器
fn build_model_loader(config: &AppConfig) -> anyhow::Result<Arc<dyn ModelLoaderPort>> {
    let loader: Arc<dyn ModelLoaderPort> = match config.model.backend {
        ModelBackend::Http => {
            let http_config = HttpMusicModelConfig::new(config.model.url.clone())
                .with_timeout(config.model.timeout_secs);
            Arc::new(HttpModelLoader::new(http_config)?)
        }
        ModelBackend::Fake => {
            tracing::warn!("Using fake model backend: output is a generated test tone");
            Arc::new(FakeModelLoader::new(FakeMusicModelConfig {
                channels: config.model.fake_channels,
                ..Default::default()
            }))
        }
    };
    Ok(loader)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("musegen - Text to Music Generator");
    print_config(&config);

    if let Some(root) = &config.storage.temp_root {
        tokio::fs::create_dir_all(root).await?;
    }

    // 模型在第一次请求时加载
    let loader = build_model_loader(&config)?;
    let registry = Arc::new(ModelRegistry::new(config.model.name.clone(), loader));

    let storage = Arc::new(
        TempWavStorage::new(config.storage.temp_root.clone())
            .with_file_name(config.storage.file_name.clone()),
    );

    let orchestrator = Arc::new(SessionOrchestrator::new(
        registry,
        storage,
        Arc::new(WavProbe::new()),
        OrchestratorConfig {
            use_sampling: config.generation.use_sampling,
            top_k: config.generation.top_k,
        },
    ));

    let page = PageSettings {
        default_duration: config.generation.default_duration_secs,
        max_duration: config.generation.max_duration_secs,
    };

    let server = HttpServer::new(&config.server, AppState::new(orchestrator, page));

    tracing::info!("Open {} in a browser", config.server.public_base_url());

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
