use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::consultation::domain::LanguageCode;

/// 语音识别服务错误类型
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty audio clip")]
    EmptyClip,

    #[error("Service not configured: {0}")]
    NotConfigured(String),
}

/// 一次录音打包后的音频
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl AudioClip {
    /// 把录音期间的全部数据块按顺序拼成一个片段
    pub fn from_chunks(chunks: Vec<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        let total = chunks.iter().map(Vec::len).sum();
        let mut data = Vec::with_capacity(total);
        for chunk in chunks {
            data.extend_from_slice(&chunk);
        }
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 上传时使用的文件名
    pub fn file_name(&self) -> String {
        let ext = self
            .mime_type
            .split('/')
            .nth(1)
            .and_then(|s| s.split(';').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("bin");
        format!("recording.{}", ext)
    }
}

/// 语音识别响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranscriptionResponse {
    pub fn recognized(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(error.into()),
        }
    }

    /// 成功且识别出非空文字时返回文字
    pub fn recognized_text(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// 语音识别端口
#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// 识别一段录音
    async fn transcribe(
        &self,
        clip: AudioClip,
        language: &LanguageCode,
    ) -> Result<TranscriptionResponse, TranscriptionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_from_chunks_keeps_order() {
        let clip = AudioClip::from_chunks(vec![vec![1, 2], vec![], vec![3]], "audio/webm");
        assert_eq!(clip.data, vec![1, 2, 3]);
        assert_eq!(clip.len(), 3);
        assert_eq!(clip.file_name(), "recording.webm");
    }

    #[test]
    fn test_file_name_strips_codec_parameters() {
        let clip = AudioClip::from_chunks(vec![vec![0]], "audio/ogg;codecs=opus");
        assert_eq!(clip.file_name(), "recording.ogg");
    }

    #[test]
    fn test_recognized_text() {
        assert_eq!(
            TranscriptionResponse::recognized("hello").recognized_text(),
            Some("hello")
        );
        assert_eq!(TranscriptionResponse::recognized("  ").recognized_text(), None);
        assert_eq!(TranscriptionResponse::failed("no speech").recognized_text(), None);

        let odd = TranscriptionResponse {
            success: false,
            text: Some("ignored".to_string()),
            error: None,
        };
        assert_eq!(odd.recognized_text(), None);
    }
}
