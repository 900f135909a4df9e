//! Storage Adapter - 临时文件存储

mod temp_wav_storage;

pub use temp_wav_storage::{TempWavStorage, DEFAULT_FILE_NAME};
