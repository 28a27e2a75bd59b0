// HTTP 咨询服务适配器
//
// POST JSON 到咨询接口，响应体即 `ConsultationResult`

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use crate::modules::config::ServiceConfig;
use crate::modules::consultation::ports::{
    ConsultationError, ConsultationPort, ConsultationRequest, ConsultationResult,
};

/// HTTP 咨询适配器
pub struct HttpConsultationAdapter {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    timeout_secs: u64,
}

impl HttpConsultationAdapter {
    /// 根据服务配置创建适配器
    pub fn new(config: &ServiceConfig) -> Result<Self, ConsultationError> {
        if config.base_url.trim().is_empty() {
            return Err(ConsultationError::NotConfigured(
                "service base URL is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConsultationError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(&config.consult_path),
            api_token: config.api_token.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, err: reqwest::Error) -> ConsultationError {
        if err.is_timeout() {
            ConsultationError::Timeout(self.timeout_secs)
        } else {
            ConsultationError::NetworkError(err.to_string())
        }
    }

    /// 解析响应体
    fn parse_result(body: &str) -> Result<ConsultationResult, ConsultationError> {
        serde_json::from_str(body).map_err(|e| ConsultationError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ConsultationPort for HttpConsultationAdapter {
    fn service_id(&self) -> &str {
        "http"
    }

    async fn consult(
        &self,
        request: ConsultationRequest,
    ) -> Result<ConsultationResult, ConsultationError> {
        debug!(
            "[HttpConsultation] Sending consultation request to {}: session={}, language={}",
            self.endpoint, request.session_id, request.language
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("[HttpConsultation] API error: {} - {}", status, error_text);
            return Err(ConsultationError::ApiError {
                code: status.as_str().to_string(),
                message: error_text,
            });
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        Self::parse_result(&body)
    }
}
