// Config Domain Entities
//
// 配置领域实体定义

use serde::{Deserialize, Serialize};

use crate::modules::consultation::domain::{LanguageCatalog, LanguageCode};

/// 咨询会话配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsultationConfig {
    /// 初始活动语言，同时也是本地化文本缺失时的回退语言
    pub default_language: String,
    /// 录音时长上限，到达后自动停止
    pub max_recording_secs: u32,
    /// 录音计时间隔
    pub tick_millis: u64,
    /// 上传录音使用的 MIME 类型
    pub audio_mime_type: String,
}

impl Default for ConsultationConfig {
    fn default() -> Self {
        Self {
            default_language: "ja".to_string(),
            max_recording_secs: 30,
            tick_millis: 1000,
            audio_mime_type: "audio/webm".to_string(),
        }
    }
}

impl ConsultationConfig {
    pub fn default_language_code(&self) -> LanguageCode {
        LanguageCode::new(self.default_language.as_str())
    }
}

/// 远端咨询服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub consult_path: String,
    pub transcribe_path: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            consult_path: "/api/ai-consultation/consult".to_string(),
            transcribe_path: "/api/ai-consultation/transcribe".to_string(),
            timeout_secs: 60,
            api_token: None,
        }
    }
}

impl ServiceConfig {
    /// 拼接完整的接口地址
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// 应用配置根
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub consultation: ConsultationConfig,
    pub service: ServiceConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并部分配置更新
    pub fn merge(&mut self, partial: PartialAppConfig) {
        if let Some(consultation) = partial.consultation {
            if let Some(default_language) = consultation.default_language {
                self.consultation.default_language = default_language;
            }
            if let Some(max_recording_secs) = consultation.max_recording_secs {
                self.consultation.max_recording_secs = max_recording_secs;
            }
            if let Some(tick_millis) = consultation.tick_millis {
                self.consultation.tick_millis = tick_millis;
            }
            if let Some(audio_mime_type) = consultation.audio_mime_type {
                self.consultation.audio_mime_type = audio_mime_type;
            }
        }

        if let Some(service) = partial.service {
            if let Some(base_url) = service.base_url {
                self.service.base_url = base_url;
            }
            if let Some(consult_path) = service.consult_path {
                self.service.consult_path = consult_path;
            }
            if let Some(transcribe_path) = service.transcribe_path {
                self.service.transcribe_path = transcribe_path;
            }
            if let Some(timeout_secs) = service.timeout_secs {
                self.service.timeout_secs = timeout_secs;
            }
            if let Some(api_token) = service.api_token {
                self.service.api_token = Some(api_token).filter(|t| !t.is_empty());
            }
        }
    }

    /// 验证配置是否有效
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !LanguageCatalog::is_supported(&self.consultation.default_language_code()) {
            errors.push(format!(
                "Default language '{}' is not in the language catalog",
                self.consultation.default_language
            ));
        }

        if self.consultation.max_recording_secs == 0 || self.consultation.max_recording_secs > 300
        {
            errors.push("Max recording seconds must be between 1 and 300".to_string());
        }

        if self.consultation.tick_millis == 0 {
            errors.push("Tick interval must be greater than zero".to_string());
        }

        if self.consultation.audio_mime_type.trim().is_empty() {
            errors.push("Audio MIME type must not be empty".to_string());
        }

        if self.service.base_url.trim().is_empty() {
            errors.push("Service base URL must not be empty".to_string());
        }

        if self.service.timeout_secs == 0 {
            errors.push("Service timeout must be greater than zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// 部分配置更新（用于合并）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialAppConfig {
    pub consultation: Option<PartialConsultationConfig>,
    pub service: Option<PartialServiceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialConsultationConfig {
    pub default_language: Option<String>,
    pub max_recording_secs: Option<u32>,
    pub tick_millis: Option<u64>,
    pub audio_mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialServiceConfig {
    pub base_url: Option<String>,
    pub consult_path: Option<String>,
    pub transcribe_path: Option<String>,
    pub timeout_secs: Option<u64>,
    /// 传空串表示清除
    pub api_token: Option<String>,
}
