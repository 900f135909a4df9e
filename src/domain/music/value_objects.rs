//! Music Context - Value Objects

use serde::{Deserialize, Serialize};

/// 模型输出采样率（Hz）
///
/// 写入文件时使用的采样率必须与生成时假定的采样率一致
pub const MODEL_SAMPLE_RATE: u32 = 32000;

/// 音乐描述文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description(String);

impl Description {
    pub fn new(text: impl Into<String>) -> Result<Self, super::RequestError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(super::RequestError::EmptyDescription);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Description {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 生成时长（秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DurationSecs(u32);

impl DurationSecs {
    /// 滑块下限
    pub const MIN: u32 = 0;
    /// 滑块上限
    pub const MAX: u32 = 20;
    /// 滑块默认值
    pub const DEFAULT: u32 = 10;

    pub fn new(value: i64) -> Result<Self, super::RequestError> {
        Self::bounded(value, Self::MAX)
    }

    /// 使用自定义上限校验（上限不会超过 [`DurationSecs::MAX`]）
    pub fn bounded(value: i64, max: u32) -> Result<Self, super::RequestError> {
        let max = max.min(Self::MAX);
        if value < Self::MIN as i64 || value > max as i64 {
            return Err(super::RequestError::DurationOutOfRange {
                value,
                min: Self::MIN,
                max,
            });
        }
        Ok(Self(value as u32))
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }

    /// 该时长对应的帧数
    pub fn frames(&self, sample_rate: u32) -> usize {
        self.0 as usize * sample_rate as usize
    }
}

impl Default for DurationSecs {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl std::fmt::Display for DurationSecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// 生成请求
///
/// 每次提交创建一次，不持久化，用完即弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub description: Description,
    pub duration: DurationSecs,
}

impl GenerationRequest {
    pub fn new(description: impl Into<String>, duration: i64) -> Result<Self, super::RequestError> {
        Ok(Self {
            description: Description::new(description)?,
            duration: DurationSecs::new(duration)?,
        })
    }

    /// 使用配置的时长上限校验
    pub fn bounded(
        description: impl Into<String>,
        duration: i64,
        max_duration: u32,
    ) -> Result<Self, super::RequestError> {
        Ok(Self {
            description: Description::new(description)?,
            duration: DurationSecs::bounded(duration, max_duration)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::music::RequestError;

    #[test]
    fn test_description_rejects_blank() {
        assert_eq!(Description::new(""), Err(RequestError::EmptyDescription));
        assert_eq!(Description::new("   \n"), Err(RequestError::EmptyDescription));
        assert!(Description::new("lofi beat").is_ok());
    }

    #[test]
    fn test_duration_bounds() {
        assert!(DurationSecs::new(0).is_ok());
        assert!(DurationSecs::new(20).is_ok());
        assert_eq!(
            DurationSecs::new(21),
            Err(RequestError::DurationOutOfRange { value: 21, min: 0, max: 20 })
        );
        assert!(DurationSecs::new(-1).is_err());
    }

    #[test]
    fn test_bounded_never_exceeds_slider_max() {
        assert!(DurationSecs::bounded(20, 60).is_ok());
        assert!(DurationSecs::bounded(21, 60).is_err());
        assert!(DurationSecs::bounded(6, 5).is_err());
    }

    #[test]
    fn test_duration_frames() {
        let d = DurationSecs::new(3).unwrap();
        assert_eq!(d.frames(MODEL_SAMPLE_RATE), 96000);
        assert_eq!(DurationSecs::default().as_secs(), 10);
    }

    #[test]
    fn test_generation_request() {
        let req = GenerationRequest::new("happy rock", 5).unwrap();
        assert_eq!(req.description.as_str(), "happy rock");
        assert_eq!(req.duration.as_secs(), 5);

        assert!(GenerationRequest::bounded("happy rock", 8, 5).is_err());
        assert!(GenerationRequest::bounded("", 3, 5).is_err());
    }
}
