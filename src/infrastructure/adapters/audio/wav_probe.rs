//! WAV Probe - 基于 symphonia 的音频信息读取
//!
//! 读回写入的 WAV，确认采样率、声道数和时长

use std::io::Cursor;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioInfo, AudioProbePort, ProbeError};

/// WAV 信息读取器
#[derive(Debug, Default)]
pub struct WavProbe;

impl WavProbe {
    pub fn new() -> Self {
        Self
    }

    /// 逐包解码统计帧数（容器未给出总帧数时使用）
    fn count_frames(
        format: &mut Box<dyn symphonia::core::formats::FormatReader>,
        track_id: u32,
        codec_params: &symphonia::core::codecs::CodecParameters,
    ) -> Result<u64, ProbeError> {
        let mut decoder = symphonia::default::get_codecs()
            .make(codec_params, &DecoderOptions::default())
            .map_err(|e| ProbeError::DecodingError(format!("Decoder creation failed: {}", e)))?;

        let mut frames = 0u64;
        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(ProbeError::DecodingError(format!(
                        "Packet read error: {}",
                        e
                    )));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => frames += decoded.frames() as u64,
                Err(e) => {
                    tracing::warn!("Decode error (skipping packet): {}", e);
                }
            }
        }

        Ok(frames)
    }
}

impl AudioProbePort for WavProbe {
    fn probe(&self, wav_data: &[u8]) -> Result<AudioInfo, ProbeError> {
        if wav_data.len() < 12 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
            return Err(ProbeError::InvalidInput(
                "Invalid WAV: missing RIFF/WAVE header".to_string(),
            ));
        }

        let cursor = Cursor::new(wav_data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        hint.with_extension("wav");

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| ProbeError::DecodingError(format!("Probe failed: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| ProbeError::DecodingError("No audio track found".to_string()))?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| ProbeError::DecodingError("Unknown sample rate".to_string()))?;

        let channels = codec_params
            .channels
            .map(|c| c.count() as u8)
            .ok_or_else(|| ProbeError::DecodingError("Unknown channel count".to_string()))?;

        let frames = match codec_params.n_frames {
            Some(n) => n,
            None => Self::count_frames(&mut format, track_id, &codec_params)?,
        };

        let duration_ms = if sample_rate > 0 {
            frames * 1000 / sample_rate as u64
        } else {
            0
        };

        Ok(AudioInfo {
            sample_rate,
            channels,
            frames,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_wav(sample_rate: u32, channels: u16, frames: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..frames * channels as u32 {
                writer.write_sample(0.0f32).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_probe_float_wav() {
        let wav = create_test_wav(32000, 1, 64000);
        let info = WavProbe::new().probe(&wav).unwrap();

        assert_eq!(info.sample_rate, 32000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.frames, 64000);
        assert_eq!(info.duration_ms, 2000);
    }

    #[test]
    fn test_probe_stereo() {
        let wav = create_test_wav(32000, 2, 16000);
        let info = WavProbe::new().probe(&wav).unwrap();

        assert_eq!(info.channels, 2);
        assert_eq!(info.duration_ms, 500);
    }

    #[test]
    fn test_probe_rejects_garbage() {
        let result = WavProbe::new().probe(b"definitely not audio");
        assert!(matches!(result, Err(ProbeError::InvalidInput(_))));
    }
}
