//! Fake Music Model - 本地开发和测试用的模型
//!
//! 不调用任何推理服务，按请求时长生成确定性的正弦音

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::ports::{
    GenerationParams, ModelError, ModelLoaderPort, MusicModelPort,
};
use crate::domain::{SampleBuffer, MODEL_SAMPLE_RATE};

/// Fake 模型配置
#[derive(Debug, Clone)]
pub struct FakeMusicModelConfig {
    /// 输出采样率
    pub sample_rate: u32,
    /// 输出声道数
    pub channels: usize,
    /// 是否输出带 batch 维度的三维张量（false 时单描述输出二维）
    pub batched_output: bool,
    /// 正弦波振幅
    pub amplitude: f32,
}

impl Default for FakeMusicModelConfig {
    fn default() -> Self {
        Self {
            sample_rate: MODEL_SAMPLE_RATE,
            channels: 1,
            batched_output: true,
            amplitude: 0.3,
        }
    }
}

type RecordedCall = (Vec<String>, GenerationParams);

/// Fake Music Model
pub struct FakeMusicModel {
    name: String,
    config: FakeMusicModelConfig,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeMusicModel {
    pub fn new(name: impl Into<String>, config: FakeMusicModelConfig) -> Self {
        Self {
            name: name.into(),
            config,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 已收到的生成调用
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// 由描述决定音高，同一描述总是得到同一音高
    fn tone_frequency(description: &str) -> f32 {
        let sum: u32 = description.bytes().map(u32::from).sum();
        220.0 + (sum % 440) as f32
    }
}

#[async_trait]
impl MusicModelPort for FakeMusicModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    async fn generate(
        &self,
        descriptions: &[String],
        params: &GenerationParams,
    ) -> Result<SampleBuffer, ModelError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((descriptions.to_vec(), params.clone()));
        }

        let frames = params.duration_secs as usize * self.config.sample_rate as usize;
        let channels = self.config.channels;
        let mut data = Vec::with_capacity(descriptions.len() * channels * frames);

        for description in descriptions {
            let freq = Self::tone_frequency(description);
            for ch in 0..channels {
                // 各声道相位错开，便于区分
                let phase = ch as f32 * std::f32::consts::FRAC_PI_2;
                data.extend((0..frames).map(|i| {
                    let t = i as f32 / self.config.sample_rate as f32;
                    self.config.amplitude
                        * (2.0 * std::f32::consts::PI * freq * t + phase).sin()
                }));
            }
        }

        let shape = if !self.config.batched_output && descriptions.len() == 1 {
            vec![channels, frames]
        } else {
            vec![descriptions.len(), channels, frames]
        };

        tracing::debug!(
            model = %self.name,
            ?shape,
            "FakeMusicModel: returning generated tone"
        );

        SampleBuffer::new(shape, data).map_err(|e| ModelError::InvalidResponse(e.to_string()))
    }
}

/// Fake 模型加载器
///
/// 记录加载次数，可配置为加载失败
pub struct FakeModelLoader {
    config: FakeMusicModelConfig,
    failure: Option<String>,
    load_count: AtomicUsize,
    last_model: Mutex<Option<Arc<FakeMusicModel>>>,
}

impl FakeModelLoader {
    pub fn new(config: FakeMusicModelConfig) -> Self {
        Self {
            config,
            failure: None,
            load_count: AtomicUsize::new(0),
            last_model: Mutex::new(None),
        }
    }

    /// 每次加载都失败的加载器
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new(FakeMusicModelConfig::default())
        }
    }

    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    /// 最近一次加载出的模型
    pub fn last_model(&self) -> Option<Arc<FakeMusicModel>> {
        self.last_model.lock().ok().and_then(|m| m.clone())
    }
}

#[async_trait]
impl ModelLoaderPort for FakeModelLoader {
    async fn load(&self, name: &str) -> Result<Arc<dyn MusicModelPort>, ModelError> {
        self.load_count.fetch_add(1, Ordering::SeqCst);

        // 让并发的首次访问真正交错
        tokio::task::yield_now().await;

        if let Some(message) = &self.failure {
            return Err(ModelError::LoadFailed(message.clone()));
        }

        let model = Arc::new(FakeMusicModel::new(name, self.config.clone()));
        if let Ok(mut last) = self.last_model.lock() {
            *last = Some(model.clone());
        }

        tracing::info!(model = %name, "FakeModelLoader: model ready");
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generates_requested_frames() {
        let model = FakeMusicModel::new("fake", FakeMusicModelConfig::default());
        let out = model
            .generate(&["lofi".to_string()], &GenerationParams::new(2))
            .await
            .unwrap();

        assert_eq!(out.shape(), &[1, 1, 64000]);
        assert!(out.data().iter().all(|s| s.abs() <= 0.3 + f32::EPSILON));
    }

    #[tokio::test]
    async fn test_unbatched_output_is_rank2() {
        let config = FakeMusicModelConfig {
            channels: 2,
            batched_output: false,
            ..Default::default()
        };
        let model = FakeMusicModel::new("fake", config);
        let out = model
            .generate(&["lofi".to_string()], &GenerationParams::new(1))
            .await
            .unwrap();

        assert_eq!(out.shape(), &[2, 32000]);
    }

    #[tokio::test]
    async fn test_same_description_is_deterministic() {
        let model = FakeMusicModel::new("fake", FakeMusicModelConfig::default());
        let params = GenerationParams::new(1);
        let a = model.generate(&["rain".to_string()], &params).await.unwrap();
        let b = model.generate(&["rain".to_string()], &params).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(model.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_loader() {
        let loader = FakeModelLoader::failing("boom");
        let err = loader.load("facebook/musicgen-small").await.err().unwrap();
        assert!(matches!(err, ModelError::LoadFailed(msg) if msg == "boom"));
        assert_eq!(loader.load_count(), 1);
        assert!(loader.last_model().is_none());
    }
}
