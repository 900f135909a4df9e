//! Music Context - 音乐生成限界上下文
//!
//! 职责:
//! - 生成请求（描述 + 时长）校验
//! - 模型输出的采样缓冲区及其形状规范化

mod errors;
mod sample_buffer;
mod value_objects;

pub use errors::{AudioError, RequestError};
pub use sample_buffer::{NormalizedAudio, SampleBuffer};
pub use value_objects::{
    Description, DurationSecs, GenerationRequest, MODEL_SAMPLE_RATE,
};
