//! Model Adapter - 模型后端实现

mod fake_music_model;
mod http_music_model;

pub use fake_music_model::{FakeModelLoader, FakeMusicModel, FakeMusicModelConfig};
pub use http_music_model::*;
