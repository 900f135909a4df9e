//! Model Registry - 进程级模型句柄缓存
//!
//! 模型在第一次使用时加载，整个进程生命周期内最多加载一次。
//! 并发的首次访问由 `OnceCell` 保证只有一个加载者，其余等待同一结果。
//! 加载失败同样被缓存：之后的调用直接得到缺失的句柄和原始错误信息。

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::application::ports::{ModelLoaderPort, MusicModelPort};

/// 加载结果
#[derive(Clone)]
enum ModelSlot {
    Ready(Arc<dyn MusicModelPort>),
    Failed(String),
}

/// 模型状态（用于 /api/model/status）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModelStatus {
    NotLoaded,
    Ready { name: String, sample_rate: u32 },
    Failed { error: String },
}

/// 懒加载的模型单例
pub struct ModelRegistry {
    model_name: String,
    loader: Arc<dyn ModelLoaderPort>,
    slot: OnceCell<ModelSlot>,
}

impl ModelRegistry {
    pub fn new(model_name: impl Into<String>, loader: Arc<dyn ModelLoaderPort>) -> Self {
        Self {
            model_name: model_name.into(),
            loader,
            slot: OnceCell::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 获取（必要时加载）模型句柄
    ///
    /// 加载失败时返回 `None`，错误信息可通过 [`ModelRegistry::load_error`] 获取
    pub async fn load_model(&self) -> Option<Arc<dyn MusicModelPort>> {
        let slot = self
            .slot
            .get_or_init(|| async {
                tracing::info!(model = %self.model_name, "Loading pretrained model");
                match self.loader.load(&self.model_name).await {
                    Ok(model) => {
                        tracing::info!(
                            model = %model.name(),
                            sample_rate = model.sample_rate(),
                            "Model loaded"
                        );
                        ModelSlot::Ready(model)
                    }
                    Err(e) => {
                        tracing::error!(model = %self.model_name, error = %e, "Failed to load model");
                        ModelSlot::Failed(format!("Failed to load model: {}", e))
                    }
                }
            })
            .await;

        match slot {
            ModelSlot::Ready(model) => Some(model.clone()),
            ModelSlot::Failed(_) => None,
        }
    }

    /// 已加载的模型句柄，不会触发加载
    pub fn loaded_model(&self) -> Option<Arc<dyn MusicModelPort>> {
        match self.slot.get() {
            Some(ModelSlot::Ready(model)) => Some(model.clone()),
            _ => None,
        }
    }

    /// 加载失败的错误信息（未加载或加载成功时为 `None`）
    pub fn load_error(&self) -> Option<String> {
        match self.slot.get() {
            Some(ModelSlot::Failed(msg)) => Some(msg.clone()),
            _ => None,
        }
    }

    pub fn status(&self) -> ModelStatus {
        match self.slot.get() {
            None => ModelStatus::NotLoaded,
            Some(ModelSlot::Ready(model)) => ModelStatus::Ready {
                name: model.name().to_string(),
                sample_rate: model.sample_rate(),
            },
            Some(ModelSlot::Failed(error)) => ModelStatus::Failed {
                error: error.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{FakeModelLoader, FakeMusicModelConfig};

    #[tokio::test]
    async fn test_load_model_returns_same_handle() {
        let loader = Arc::new(FakeModelLoader::new(FakeMusicModelConfig::default()));
        let registry = ModelRegistry::new("facebook/musicgen-small", loader.clone());

        assert_eq!(registry.status(), ModelStatus::NotLoaded);

        let first = registry.load_model().await.unwrap();
        let second = registry.load_model().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.load_count(), 1);
        assert_eq!(
            registry.status(),
            ModelStatus::Ready {
                name: "facebook/musicgen-small".to_string(),
                sample_rate: 32000
            }
        );
    }

    #[tokio::test]
    async fn test_concurrent_first_access_loads_once() {
        let loader = Arc::new(FakeModelLoader::new(FakeMusicModelConfig::default()));
        let registry = Arc::new(ModelRegistry::new("facebook/musicgen-small", loader.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.load_model().await })
            })
            .collect();

        let mut models = Vec::new();
        for handle in handles {
            models.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(loader.load_count(), 1);
        assert!(models.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn test_load_failure_is_cached() {
        let loader = Arc::new(FakeModelLoader::failing("weights not found"));
        let registry = ModelRegistry::new("facebook/musicgen-small", loader.clone());

        assert!(registry.load_model().await.is_none());
        assert!(registry.load_model().await.is_none());
        assert_eq!(loader.load_count(), 1);

        let error = registry.load_error().unwrap();
        assert!(error.starts_with("Failed to load model:"));
        assert!(error.contains("weights not found"));
        assert!(matches!(registry.status(), ModelStatus::Failed { .. }));
    }
}
