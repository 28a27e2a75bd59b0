// HTTP 语音识别适配器
//
// multipart 上传录音片段和语言代码

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use crate::modules::config::ServiceConfig;
use crate::modules::consultation::domain::LanguageCode;
use crate::modules::consultation::ports::{
    AudioClip, TranscriptionError, TranscriptionPort, TranscriptionResponse,
};

/// HTTP 语音识别适配器
pub struct HttpTranscriptionAdapter {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HttpTranscriptionAdapter {
    pub fn new(config: &ServiceConfig) -> Result<Self, TranscriptionError> {
        if config.base_url.trim().is_empty() {
            return Err(TranscriptionError::NotConfigured(
                "service base URL is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranscriptionError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(&config.transcribe_path),
            api_token: config.api_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(clip: AudioClip, language: &LanguageCode) -> Result<Form, TranscriptionError> {
        let file_name = clip.file_name();
        let part = Part::bytes(clip.data)
            .file_name(file_name)
            .mime_str(&clip.mime_type)
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))?;

        Ok(Form::new()
            .part("audio", part)
            .text("language", language.code().to_string()))
    }

    fn parse_response(body: &str) -> Result<TranscriptionResponse, TranscriptionError> {
        serde_json::from_str(body).map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl TranscriptionPort for HttpTranscriptionAdapter {
    async fn transcribe(
        &self,
        clip: AudioClip,
        language: &LanguageCode,
    ) -> Result<TranscriptionResponse, TranscriptionError> {
        if clip.is_empty() {
            return Err(TranscriptionError::EmptyClip);
        }

        debug!(
            "[HttpTranscription] Uploading {} bytes of {} to {} (language={})",
            clip.len(),
            clip.mime_type,
            self.endpoint,
            language
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .multipart(Self::build_form(clip, language)?);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TranscriptionError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("[HttpTranscription] API error: {} - {}", status, error_text);
            return Err(TranscriptionError::ApiError {
                code: status.as_str().to_string(),
                message: error_text,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranscriptionError::NetworkError(e.to_string()))?;
        Self::parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::consultation::infrastructure::adapters::log_capture::capture_logs;

    #[test]
    fn test_parse_success_and_failure() {
        let ok = HttpTranscriptionAdapter::parse_response(r#"{"success":true,"text":"hello"}"#)
            .unwrap();
        assert_eq!(ok.recognized_text(), Some("hello"));

        let failed =
            HttpTranscriptionAdapter::parse_response(r#"{"success":false,"error":"no speech"}"#)
                .unwrap();
        assert_eq!(failed.recognized_text(), None);
        assert_eq!(failed.error.as_deref(), Some("no speech"));
    }

    #[test]
    fn test_build_form_accepts_clip_mime() {
        let clip = AudioClip::from_chunks(vec![vec![1, 2, 3]], "audio/webm");
        assert!(HttpTranscriptionAdapter::build_form(clip, &LanguageCode::from("ja")).is_ok());
    }

    #[tokio::test]
    async fn test_empty_clip_is_rejected_locally() {
        let adapter = HttpTranscriptionAdapter::new(&ServiceConfig::default()).unwrap();
        let result = adapter
            .transcribe(AudioClip::from_chunks(vec![], "audio/webm"), &LanguageCode::from("en"))
            .await;
        assert!(matches!(result, Err(TranscriptionError::EmptyClip)));
    }

    #[tokio::test]
    async fn test_logs_carry_component_prefix() {
        let (logs, _guard) = capture_logs();
        let adapter = HttpTranscriptionAdapter::new(&ServiceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let result = adapter
            .transcribe(
                AudioClip::from_chunks(vec![vec![1, 2, 3]], "audio/webm"),
                &LanguageCode::from("vi"),
            )
            .await;
        assert!(result.is_err());
        assert!(logs
            .contents()
            .contains("[HttpTranscription] Uploading 3 bytes of audio/webm"));
    }
}
