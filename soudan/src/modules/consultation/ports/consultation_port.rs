use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::consultation::domain::Urgency;

/// 咨询服务错误类型
#[derive(Debug, Error)]
pub enum ConsultationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Service not configured: {0}")]
    NotConfigured(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// 咨询请求
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    pub actor_id: String,
    pub message: String,
    pub language: String,
    pub session_id: String,
}

/// 咨询结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResult {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_response: Option<String>,
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_actions: Option<Vec<String>>,
}

impl ConsultationResult {
    pub fn new(response: impl Into<String>, urgency: Urgency) -> Self {
        Self {
            response: response.into(),
            translated_response: None,
            urgency,
            suggested_actions: None,
        }
    }

    pub fn with_translation(mut self, translated: impl Into<String>) -> Self {
        self.translated_response = Some(translated.into());
        self
    }

    pub fn with_suggested_actions(mut self, actions: Vec<String>) -> Self {
        self.suggested_actions = Some(actions);
        self
    }

    /// 展示文本：优先使用非空的译文
    pub fn display_text(&self) -> &str {
        self.translated_response
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.response)
    }
}

/// 咨询服务端口
///
/// 远端 AI 咨询服务被视为不透明服务，只约定请求与结果格式
#[async_trait]
pub trait ConsultationPort: Send + Sync {
    /// 服务标识（用于日志）
    fn service_id(&self) -> &str;

    /// 发送一次咨询
    async fn consult(
        &self,
        request: ConsultationRequest,
    ) -> Result<ConsultationResult, ConsultationError>;
}
