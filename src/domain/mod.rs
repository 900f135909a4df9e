//! Domain Layer - 领域层
//!
//! 只有一个限界上下文:
//! - Music Context: 生成请求与采样缓冲区

pub mod music;

pub use music::{
    AudioError, Description, DurationSecs, GenerationRequest, NormalizedAudio, RequestError,
    SampleBuffer, MODEL_SAMPLE_RATE,
};
