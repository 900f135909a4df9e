//! Session Orchestrator - 单次生成流水线
//!
//! 每次页面交互都是独立、无状态的一次运行:
//! 加载/复用模型 → 生成 → 写入临时文件 → 读回 → 渲染
//!
//! 只有模型加载这一步被保护（失败转为缺失的句柄）；
//! 生成和文件 IO 的错误原样向上传播给 HTTP 层。

use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::model_registry::{ModelRegistry, ModelStatus};
use crate::application::ports::{
    ArtifactStoragePort, AudioProbePort, GenerationParams, MusicModelPort,
};
use crate::application::render::{self, RenderedAudio, AUDIO_CONTENT_TYPE};
use crate::domain::{Description, DurationSecs, GenerationRequest, SampleBuffer, MODEL_SAMPLE_RATE};

/// 编排器配置
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// 是否启用随机采样
    pub use_sampling: bool,
    /// top-k 候选数量
    pub top_k: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            use_sampling: true,
            top_k: 250,
        }
    }
}

/// 流水线结果
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// 模型不可用，未生成、未写入任何文件
    Unavailable { load_error: Option<String> },
    /// 生成成功
    Rendered(RenderedAudio),
}

/// Session Orchestrator
pub struct SessionOrchestrator {
    registry: Arc<ModelRegistry>,
    storage: Arc<dyn ArtifactStoragePort>,
    probe: Arc<dyn AudioProbePort>,
    config: OrchestratorConfig,
}

impl SessionOrchestrator {
    pub fn new(
        registry: Arc<ModelRegistry>,
        storage: Arc<dyn ArtifactStoragePort>,
        probe: Arc<dyn AudioProbePort>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            storage,
            probe,
            config,
        }
    }

    /// 获取进程级共享的模型句柄
    pub async fn load_model(&self) -> Option<Arc<dyn MusicModelPort>> {
        self.registry.load_model().await
    }

    pub fn model_name(&self) -> &str {
        self.registry.model_name()
    }

    /// 模型加载失败的错误信息
    pub fn load_error(&self) -> Option<String> {
        self.registry.load_error()
    }

    pub fn model_status(&self) -> ModelStatus {
        self.registry.status()
    }

    /// 模型后端健康状态，模型尚未加载成功时为 `None`
    pub async fn backend_healthy(&self) -> Option<bool> {
        let model = self.registry.loaded_model()?;
        let healthy = model.health_check().await;
        if !healthy {
            tracing::warn!(model = %model.name(), "Model backend health check failed");
        }
        Some(healthy)
    }

    /// 为单个描述生成音频
    ///
    /// 模型句柄缺失时返回 `Ok(None)`，调用方应中止本次请求
    pub async fn generate(
        &self,
        description: &Description,
        duration: DurationSecs,
    ) -> Result<Option<SampleBuffer>, ApplicationError> {
        let Some(model) = self.load_model().await else {
            return Ok(None);
        };

        if model.sample_rate() != MODEL_SAMPLE_RATE {
            tracing::warn!(
                model = %model.name(),
                model_rate = model.sample_rate(),
                written_rate = MODEL_SAMPLE_RATE,
                "Model sample rate differs from the rate used for writing"
            );
        }

        let params = GenerationParams {
            use_sampling: self.config.use_sampling,
            top_k: self.config.top_k,
            duration_secs: duration.as_secs(),
        };

        tracing::debug!(
            model = %model.name(),
            description_len = description.as_str().len(),
            ?params,
            "Generating music"
        );

        let samples = model
            .generate(&[description.as_str().to_string()], &params)
            .await?;

        Ok(Some(samples))
    }

    /// 规范化形状并写入新的临时 WAV 文件
    pub async fn persist(&self, samples: SampleBuffer) -> Result<PathBuf, ApplicationError> {
        let normalized = samples.normalize()?;
        let path = self.storage.persist(&normalized, MODEL_SAMPLE_RATE).await?;
        Ok(path)
    }

    /// 读回文件，构造播放器和下载链接
    pub async fn render(&self, path: &Path) -> Result<RenderedAudio, ApplicationError> {
        let bytes = self.storage.read(path).await?;
        let info = self.probe.probe(&bytes)?;

        Ok(RenderedAudio {
            file_name: render::file_name_of(path),
            path: path.to_path_buf(),
            content_type: AUDIO_CONTENT_TYPE,
            player_src: render::data_uri(AUDIO_CONTENT_TYPE, &bytes),
            download_href: render::download_href(&bytes),
            info,
            bytes,
        })
    }

    /// 完整流水线
    pub async fn run(
        &self,
        request: &GenerationRequest,
    ) -> Result<PipelineOutcome, ApplicationError> {
        let generation_id = Uuid::new_v4();
        tracing::info!(
            %generation_id,
            duration = %request.duration,
            "Generation requested"
        );

        let Some(samples) = self
            .generate(&request.description, request.duration)
            .await?
        else {
            tracing::warn!(%generation_id, "Music generation unavailable");
            return Ok(PipelineOutcome::Unavailable {
                load_error: self.load_error(),
            });
        };

        let path = self.persist(samples).await?;
        let rendered = self.render(&path).await?;

        tracing::info!(
            %generation_id,
            path = %rendered.path.display(),
            size = rendered.bytes.len(),
            duration_ms = rendered.info.duration_ms,
            "Generation completed"
        );

        Ok(PipelineOutcome::Rendered(rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ModelLoaderPort;
    use crate::infrastructure::adapters::{
        FakeModelLoader, FakeMusicModelConfig, TempWavStorage, WavProbe,
    };
    use tempfile::{tempdir, TempDir};

    fn orchestrator_with(loader: Arc<dyn ModelLoaderPort>) -> (SessionOrchestrator, TempDir) {
        let root = tempdir().unwrap();
        let registry = Arc::new(ModelRegistry::new("facebook/musicgen-small", loader));
        let storage = Arc::new(TempWavStorage::new(Some(root.path().to_path_buf())));
        let orchestrator = SessionOrchestrator::new(
            registry,
            storage,
            Arc::new(WavProbe::new()),
            OrchestratorConfig::default(),
        );
        (orchestrator, root)
    }

    fn fake_orchestrator(config: FakeMusicModelConfig) -> (SessionOrchestrator, TempDir) {
        orchestrator_with(Arc::new(FakeModelLoader::new(config)))
    }

    #[tokio::test]
    async fn test_persisted_file_matches_requested_duration() {
        let (orchestrator, _root) = fake_orchestrator(FakeMusicModelConfig::default());

        for secs in [1, 3] {
            let description = Description::new("calm piano").unwrap();
            let duration = DurationSecs::new(secs).unwrap();

            let samples = orchestrator
                .generate(&description, duration)
                .await
                .unwrap()
                .unwrap();
            let path = orchestrator.persist(samples).await.unwrap();
            let rendered = orchestrator.render(&path).await.unwrap();

            assert_eq!(rendered.info.sample_rate, MODEL_SAMPLE_RATE);
            assert_eq!(rendered.info.frames, secs as u64 * MODEL_SAMPLE_RATE as u64);
            assert_eq!(rendered.info.duration_ms, secs as u64 * 1000);
        }
    }

    #[tokio::test]
    async fn test_each_persist_uses_fresh_directory() {
        let (orchestrator, _root) = fake_orchestrator(FakeMusicModelConfig::default());
        let description = Description::new("jazz").unwrap();
        let duration = DurationSecs::new(1).unwrap();

        let a = orchestrator.generate(&description, duration).await.unwrap().unwrap();
        let b = orchestrator.generate(&description, duration).await.unwrap().unwrap();
        let path_a = orchestrator.persist(a).await.unwrap();
        let path_b = orchestrator.persist(b).await.unwrap();

        assert_ne!(path_a.parent(), path_b.parent());
        assert_eq!(path_a.file_name(), path_b.file_name());
        assert!(path_a.exists() && path_b.exists());
    }

    #[tokio::test]
    async fn test_failed_load_generates_nothing_and_writes_nothing() {
        let (orchestrator, root) =
            orchestrator_with(Arc::new(FakeModelLoader::failing("no weights")));
        let description = Description::new("epic orchestra").unwrap();

        let samples = orchestrator
            .generate(&description, DurationSecs::new(5).unwrap())
            .await
            .unwrap();
        assert!(samples.is_none());

        let request = GenerationRequest::new("epic orchestra", 5).unwrap();
        match orchestrator.run(&request).await.unwrap() {
            PipelineOutcome::Unavailable { load_error } => {
                assert!(load_error.unwrap().contains("no weights"));
            }
            PipelineOutcome::Rendered(_) => panic!("expected unavailable outcome"),
        }

        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_payload_equals_file_bytes() {
        let (orchestrator, _root) = fake_orchestrator(FakeMusicModelConfig::default());
        let request = GenerationRequest::new("drum and bass", 2).unwrap();

        let PipelineOutcome::Rendered(rendered) = orchestrator.run(&request).await.unwrap() else {
            panic!("expected rendered outcome");
        };

        let on_disk = std::fs::read(&rendered.path).unwrap();
        let decoded = render::decode_data_uri(&rendered.download_href).unwrap();
        assert_eq!(decoded, on_disk);
        assert_eq!(rendered.bytes, on_disk);
        assert_eq!(rendered.file_name, "audio_output.wav");
        assert!(rendered
            .download_href
            .starts_with("data:application/octet-stream;base64,"));
    }

    #[tokio::test]
    async fn test_rank2_model_output_is_written() {
        let config = FakeMusicModelConfig {
            channels: 2,
            batched_output: false,
            ..Default::default()
        };
        let (orchestrator, _root) = fake_orchestrator(config);
        let request = GenerationRequest::new("stereo synthwave", 1).unwrap();

        let PipelineOutcome::Rendered(rendered) = orchestrator.run(&request).await.unwrap() else {
            panic!("expected rendered outcome");
        };
        assert_eq!(rendered.info.channels, 2);
        assert_eq!(rendered.info.frames, MODEL_SAMPLE_RATE as u64);
    }

    #[tokio::test]
    async fn test_generation_params_forwarded() {
        let loader = Arc::new(FakeModelLoader::new(FakeMusicModelConfig::default()));
        let (orchestrator, _root) = orchestrator_with(loader.clone());
        let description = Description::new("ambient").unwrap();

        orchestrator
            .generate(&description, DurationSecs::new(4).unwrap())
            .await
            .unwrap();

        let model = loader.last_model().unwrap();
        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, vec!["ambient".to_string()]);
        assert_eq!(
            calls[0].1,
            GenerationParams {
                use_sampling: true,
                top_k: 250,
                duration_secs: 4
            }
        );
    }
}
