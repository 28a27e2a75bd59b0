// Consultation Commands
//
// 聊天视图使用的命令；每个命令返回渲染需要的最新数据

use serde::Serialize;

use crate::modules::consultation::{
    CaptureOutcome, ChatMessage, LanguageOption, MessageId, SendOutcome, SessionSnapshot,
    StartOutcome, ToggleOutcome,
};
use crate::modules::ConsultationModule;
use crate::shared::AppResult;

/// 发送结果 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    /// `skipped` / `answered` / `failed` / `discarded`
    pub status: &'static str,
    /// 本次追加到会话的消息
    pub appended: Vec<ChatMessage>,
}

impl From<SendOutcome> for SendMessageResponse {
    fn from(outcome: SendOutcome) -> Self {
        match outcome {
            SendOutcome::Skipped(_) => Self {
                status: "skipped",
                appended: Vec::new(),
            },
            SendOutcome::Answered {
                user_message,
                assistant_message,
                escalation,
            } => {
                let mut appended = vec![user_message, assistant_message];
                appended.extend(escalation);
                Self {
                    status: "answered",
                    appended,
                }
            }
            SendOutcome::Failed {
                user_message,
                apology,
            } => Self {
                status: "failed",
                appended: vec![user_message, apology],
            },
            SendOutcome::Discarded { .. } => Self {
                status: "discarded",
                appended: Vec::new(),
            },
        }
    }
}

/// 录音按钮结果 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingResponse {
    /// `recording` / `busy` / `deviceUnavailable` / `transcribed` / `transcriptionFailed` / `idle`
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecordingResponse {
    fn status(status: &'static str) -> Self {
        Self {
            status,
            text: None,
            error: None,
        }
    }
}

impl From<StartOutcome> for RecordingResponse {
    fn from(outcome: StartOutcome) -> Self {
        match outcome {
            StartOutcome::Started => Self::status("recording"),
            StartOutcome::Busy => Self::status("busy"),
            StartOutcome::DeviceUnavailable(e) => Self {
                error: Some(e.to_string()),
                ..Self::status("deviceUnavailable")
            },
        }
    }
}

impl From<CaptureOutcome> for RecordingResponse {
    fn from(outcome: CaptureOutcome) -> Self {
        match outcome {
            CaptureOutcome::Transcribed(text) => Self {
                text: Some(text),
                ..Self::status("transcribed")
            },
            CaptureOutcome::TranscriptionFailed(error) => Self {
                error: Some(error),
                ..Self::status("transcriptionFailed")
            },
            CaptureOutcome::NotRecording | CaptureOutcome::Cancelled => Self::status("idle"),
        }
    }
}

impl From<ToggleOutcome> for RecordingResponse {
    fn from(outcome: ToggleOutcome) -> Self {
        match outcome {
            ToggleOutcome::Start(outcome) => outcome.into(),
            ToggleOutcome::Stop(outcome) => outcome.into(),
        }
    }
}

/// 发送一条消息
pub async fn consultation_send(
    module: &ConsultationModule,
    utterance: String,
) -> AppResult<SendMessageResponse> {
    let outcome = module.send(utterance).await?;
    Ok(outcome.into())
}

/// 切换语言，返回重置后的快照
pub async fn consultation_change_language(
    module: &ConsultationModule,
    language: String,
) -> AppResult<SessionSnapshot> {
    module.change_language(language).await?;
    Ok(module.snapshot().await?)
}

/// 输入框内容变化
pub async fn consultation_update_composer(
    module: &ConsultationModule,
    text: String,
) -> AppResult<bool> {
    Ok(module.update_composer(text).await?.accepted)
}

/// 点击建议回复，返回输入框内容
pub async fn consultation_adopt_action(
    module: &ConsultationModule,
    message_id: String,
    index: usize,
) -> AppResult<String> {
    let response = module
        .adopt_suggested_action(MessageId::from(message_id.as_str()), index)
        .await?;
    Ok(response.composer)
}

/// 录音按钮：空闲时开始，录音中停止
pub async fn consultation_toggle_recording(
    module: &ConsultationModule,
) -> AppResult<RecordingResponse> {
    Ok(module.toggle_recording().await.into())
}

/// 当前会话快照
pub async fn consultation_snapshot(module: &ConsultationModule) -> AppResult<SessionSnapshot> {
    Ok(module.snapshot().await?)
}

/// 语言选择器
pub async fn consultation_languages(module: &ConsultationModule) -> AppResult<Vec<LanguageOption>> {
    Ok(module.languages().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{AppState, EventBus};
    use crate::modules::config::AppConfig;
    use crate::modules::consultation::{
        ConsultationPorts, ConsultationResult, DeviceError, FakeAudioDevice,
        ScriptedConsultationAdapter, ScriptedTranscriptionAdapter, Urgency,
    };
    use crate::modules::consultation::ports::Actor;
    use crate::shared::AppError;
    use std::sync::Arc;

    fn module(consultation: ScriptedConsultationAdapter, device: FakeAudioDevice) -> ConsultationModule {
        let ports = ConsultationPorts {
            consultation: Arc::new(consultation),
            transcription: Arc::new(ScriptedTranscriptionAdapter::new()),
            audio_device: Arc::new(device),
            actors: Arc::new(AppState::with_actor(Actor::new("u1", "Ana"))),
        };
        ConsultationModule::new(&AppConfig::default(), ports, Arc::new(EventBus::new())).unwrap()
    }

    #[tokio::test]
    async fn test_send_response_lists_appended_messages() {
        let module = module(
            ScriptedConsultationAdapter::new()
                .then_reply(ConsultationResult::new("すぐに119へ", Urgency::Critical)),
            FakeAudioDevice::new(),
        );

        let response = consultation_send(&module, "胸が痛い".to_string()).await.unwrap();
        assert_eq!(response.status, "answered");
        assert_eq!(response.appended.len(), 3);

        let skipped = consultation_send(&module, " ".to_string()).await.unwrap();
        assert_eq!(skipped.status, "skipped");
        assert!(skipped.appended.is_empty());
    }

    #[tokio::test]
    async fn test_change_language_errors_are_serializable() {
        let module = module(ScriptedConsultationAdapter::new(), FakeAudioDevice::new());

        let snapshot = consultation_change_language(&module, "en".to_string())
            .await
            .unwrap();
        assert_eq!(snapshot.messages.len(), 1);

        let err = consultation_change_language(&module, "klingon".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedLanguage(_)));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            "Unsupported language: klingon"
        );
    }

    #[tokio::test]
    async fn test_toggle_recording_with_denied_device() {
        let module = module(
            ScriptedConsultationAdapter::new(),
            FakeAudioDevice::failing(DeviceError::NoDevice),
        );

        let response = consultation_toggle_recording(&module).await.unwrap();
        assert_eq!(response.status, "deviceUnavailable");
        assert!(response.error.is_some());
        assert_eq!(consultation_languages(&module).await.unwrap().len(), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_recording_round_trip() {
        let module = module(ScriptedConsultationAdapter::new(), FakeAudioDevice::new());

        let started = consultation_toggle_recording(&module).await.unwrap();
        assert_eq!(started.status, "recording");

        let stopped = consultation_toggle_recording(&module).await.unwrap();
        assert_eq!(stopped.status, "transcriptionFailed");
        assert_eq!(stopped.error.as_deref(), Some("no speech"));
    }
}
