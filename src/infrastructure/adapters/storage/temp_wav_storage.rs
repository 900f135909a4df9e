//! Temp WAV Storage - 临时目录 WAV 存储实现
//!
//! 实现 ArtifactStoragePort trait。每次写入都分配一个新的唯一临时目录，
//! 文件不做清理，生命周期交给操作系统的临时目录策略。

use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ArtifactStoragePort, StorageError};
use crate::domain::NormalizedAudio;

/// 默认输出文件名
pub const DEFAULT_FILE_NAME: &str = "audio_output.wav";

/// 临时目录前缀
const TEMP_DIR_PREFIX: &str = "musegen-";

/// 临时目录 WAV 存储
pub struct TempWavStorage {
    /// 临时目录根（None 表示系统临时目录）
    root: Option<PathBuf>,
    /// 输出文件名
    file_name: String,
}

impl TempWavStorage {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// 分配新的唯一目录，返回后不会被自动删除
    fn allocate_dir(&self) -> Result<PathBuf, StorageError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_DIR_PREFIX);

        let dir = match &self.root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(dir.keep())
    }
}

/// 以 32 位浮点 PCM 写入 WAV
fn write_wav(
    path: &Path,
    samples: &[f32],
    channels: u16,
    sample_rate: u32,
) -> Result<(), StorageError> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer =
        WavWriter::create(path, spec).map_err(|e| StorageError::EncodingError(e.to_string()))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| StorageError::EncodingError(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| StorageError::EncodingError(e.to_string()))
}

#[async_trait]
impl ArtifactStoragePort for TempWavStorage {
    async fn persist(
        &self,
        audio: &NormalizedAudio,
        sample_rate: u32,
    ) -> Result<PathBuf, StorageError> {
        let channels = u16::try_from(audio.channels()).map_err(|_| {
            StorageError::EncodingError(format!("Too many channels: {}", audio.channels()))
        })?;
        let interleaved = audio.first_item_interleaved()?;

        let dir = self.allocate_dir()?;
        let path = dir.join(&self.file_name);

        let write_path = path.clone();
        tokio::task::spawn_blocking(move || {
            write_wav(&write_path, &interleaved, channels, sample_rate)
        })
        .await
        .map_err(|e| StorageError::IoError(format!("WAV writer task failed: {}", e)))??;

        tracing::debug!(
            path = %path.display(),
            channels = channels,
            frames = audio.frames(),
            sample_rate = sample_rate,
            "Saved audio"
        );

        Ok(path)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        if !path.exists() {
            return Err(StorageError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        fs::read(path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SampleBuffer;
    use tempfile::tempdir;

    fn stereo_audio(frames: usize) -> NormalizedAudio {
        SampleBuffer::new(vec![2, frames], vec![0.25; 2 * frames])
            .unwrap()
            .normalize()
            .unwrap()
    }

    #[tokio::test]
    async fn test_persist_and_read() {
        let root = tempdir().unwrap();
        let storage = TempWavStorage::new(Some(root.path().to_path_buf()));

        let path = storage.persist(&stereo_audio(800), 32000).await.unwrap();
        assert!(path.exists());
        assert!(path.starts_with(root.path()));
        assert_eq!(path.file_name().unwrap(), DEFAULT_FILE_NAME);

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 32000);
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_format, SampleFormat::Float);
        assert_eq!(reader.duration(), 800);

        let bytes = storage.read(&path).await.unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(bytes, std::fs::read(&path).unwrap());
    }

    #[tokio::test]
    async fn test_temp_dirs_are_kept_and_unique() {
        let root = tempdir().unwrap();
        let storage = TempWavStorage::new(Some(root.path().to_path_buf()));

        let a = storage.persist(&stereo_audio(10), 32000).await.unwrap();
        let b = storage.persist(&stereo_audio(10), 32000).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_custom_file_name() {
        let root = tempdir().unwrap();
        let storage =
            TempWavStorage::new(Some(root.path().to_path_buf())).with_file_name("clip.wav");

        let path = storage.persist(&stereo_audio(10), 32000).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "clip.wav");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let storage = TempWavStorage::new(None);
        let result = storage.read(Path::new("/nonexistent/audio_output.wav")).await;
        assert!(matches!(result, Err(StorageError::FileNotFound(_))));
    }
}
