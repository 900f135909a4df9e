//! Audio Adapter - 音频信息读取

mod wav_probe;

pub use wav_probe::WavProbe;
