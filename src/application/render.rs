//! Render - 生成结果的播放/下载表示
//!
//! 文件内容整体读入内存，以 base64 data URI 的形式同时提供给
//! 音频播放器和下载链接，浏览器无需再次请求服务器。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::application::ports::AudioInfo;

/// 播放器使用的 MIME 类型
pub const AUDIO_CONTENT_TYPE: &str = "audio/wav";

/// 下载链接使用的 MIME 类型
pub const DOWNLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// 渲染后的音频
#[derive(Debug, Clone)]
pub struct RenderedAudio {
    /// 文件名（路径的 base name）
    pub file_name: String,
    /// 文件路径
    pub path: std::path::PathBuf,
    /// 完整文件内容
    pub bytes: Vec<u8>,
    /// 播放器 MIME 类型
    pub content_type: &'static str,
    /// 播放器 src
    pub player_src: String,
    /// 下载链接 href
    pub download_href: String,
    /// 从文件读回的音频信息
    pub info: AudioInfo,
}

/// 构造 base64 data URI
pub fn data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}

/// 下载链接的 data URI
pub fn download_href(bytes: &[u8]) -> String {
    data_uri(DOWNLOAD_CONTENT_TYPE, bytes)
}

/// 从路径提取下载文件名
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio_output.wav".to_string())
}

/// 解码 data URI 的 base64 负载
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let (_, payload) = uri.strip_prefix("data:")?.split_once(";base64,")?;
    STANDARD.decode(payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_href_format() {
        let href = download_href(b"RIFF");
        assert_eq!(href, "data:application/octet-stream;base64,UklGRg==");
    }

    #[test]
    fn test_decode_data_uri() {
        let bytes = vec![0u8, 1, 2, 250, 255];
        let uri = data_uri(AUDIO_CONTENT_TYPE, &bytes);
        assert!(uri.starts_with("data:audio/wav;base64,"));
        assert_eq!(decode_data_uri(&uri).unwrap(), bytes);
        assert!(decode_data_uri("not a uri").is_none());
    }

    #[test]
    fn test_file_name_of() {
        let path = Path::new("/tmp/musegen-abc/audio_output.wav");
        assert_eq!(file_name_of(path), "audio_output.wav");
    }
}
