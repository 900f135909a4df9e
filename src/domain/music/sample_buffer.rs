//! Music Context - 采样缓冲区
//!
//! 模型输出为多维 f32 张量（行优先存储）。写入文件前统一规范化为
//! (batch, channels, frames) 三维形状。

use super::AudioError;

/// 模型输出的原始采样缓冲区
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl SampleBuffer {
    /// 创建缓冲区，要求 `shape` 各维乘积等于 `data.len()`
    ///
    /// 形状可能来自外部服务，乘积溢出时返回 `ShapeOverflow`
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, AudioError> {
        let Some(expected) = shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d)) else {
            return Err(AudioError::ShapeOverflow(shape));
        };
        if expected != data.len() {
            return Err(AudioError::LengthMismatch {
                shape,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// 规范化为 (batch, channels, frames)
    ///
    /// - 2 维 (channels, frames) 提升为 (1, channels, frames)
    /// - 3 维原样保留
    /// - 其他维度报错
    pub fn normalize(self) -> Result<NormalizedAudio, AudioError> {
        let (batch, channels, frames) = match self.shape.as_slice() {
            [c, t] => (1, *c, *t),
            [b, c, t] => (*b, *c, *t),
            _ => return Err(AudioError::InvalidShape(self.shape)),
        };

        Ok(NormalizedAudio {
            batch,
            channels,
            frames,
            data: self.data,
        })
    }
}

/// 三维采样数据 (batch, channels, frames)
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAudio {
    batch: usize,
    channels: usize,
    frames: usize,
    data: Vec<f32>,
}

impl NormalizedAudio {
    pub fn shape(&self) -> [usize; 3] {
        [self.batch, self.channels, self.frames]
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// 取出第一个批次元素，按帧交错排列（WAV 写入顺序）
    pub fn first_item_interleaved(&self) -> Result<Vec<f32>, AudioError> {
        if self.batch == 0 {
            return Err(AudioError::EmptyBatch);
        }

        let item_len = self.channels * self.frames;
        let item = &self.data[..item_len];

        let mut interleaved = Vec::with_capacity(item_len);
        for frame in 0..self.frames {
            for ch in 0..self.channels {
                interleaved.push(item[ch * self.frames + frame]);
            }
        }
        Ok(interleaved)
    }
}
