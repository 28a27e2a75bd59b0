use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::ChatMessage;
use super::value_objects::{DispatchState, RecordingState, SessionId};

/// 领域事件基础 trait
pub trait DomainEvent: Clone + Send + Sync {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> DateTime<Utc>;
}

/// 消息追加事件（渲染层据此滚动到最新消息）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAppendedEvent {
    pub session_id: SessionId,
    pub message: ChatMessage,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for MessageAppendedEvent {
    fn event_type(&self) -> &'static str {
        "transcript.appended"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 对话记录重置事件（切换语言）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResetEvent {
    pub session_id: SessionId,
    pub welcome: ChatMessage,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for TranscriptResetEvent {
    fn event_type(&self) -> &'static str {
        "transcript.reset"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 录音状态变化事件（含每秒计时）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingStateChangedEvent {
    pub session_id: SessionId,
    pub state: RecordingState,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for RecordingStateChangedEvent {
    fn event_type(&self) -> &'static str {
        "recording.state_changed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 输入框内容变化事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerChangedEvent {
    pub session_id: SessionId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for ComposerChangedEvent {
    fn event_type(&self) -> &'static str {
        "composer.changed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 发送状态变化事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchStateChangedEvent {
    pub session_id: SessionId,
    pub state: DispatchState,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for DispatchStateChangedEvent {
    fn event_type(&self) -> &'static str {
        "dispatch.state_changed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 面向用户的提示种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    /// 麦克风不可用、权限被拒绝等
    DeviceUnavailable,
    /// 语音识别失败或没有识别出文字
    TranscriptionFailed,
}

/// 面向用户的可恢复错误提示
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeEvent {
    pub session_id: SessionId,
    pub kind: NoticeKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for NoticeEvent {
    fn event_type(&self) -> &'static str {
        "notice"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 咨询领域事件枚举
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConsultationEvent {
    MessageAppended(MessageAppendedEvent),
    TranscriptReset(TranscriptResetEvent),
    RecordingStateChanged(RecordingStateChangedEvent),
    ComposerChanged(ComposerChangedEvent),
    DispatchStateChanged(DispatchStateChangedEvent),
    Notice(NoticeEvent),
}

impl ConsultationEvent {
    pub fn message_appended(session_id: &SessionId, message: &ChatMessage) -> Self {
        Self::MessageAppended(MessageAppendedEvent {
            session_id: session_id.clone(),
            message: message.clone(),
            timestamp: Utc::now(),
        })
    }

    pub fn transcript_reset(session_id: &SessionId, welcome: &ChatMessage) -> Self {
        Self::TranscriptReset(TranscriptResetEvent {
            session_id: session_id.clone(),
            welcome: welcome.clone(),
            timestamp: Utc::now(),
        })
    }

    pub fn recording_state_changed(session_id: &SessionId, state: RecordingState) -> Self {
        Self::RecordingStateChanged(RecordingStateChangedEvent {
            session_id: session_id.clone(),
            state,
            timestamp: Utc::now(),
        })
    }

    pub fn composer_changed(session_id: &SessionId, text: impl Into<String>) -> Self {
        Self::ComposerChanged(ComposerChangedEvent {
            session_id: session_id.clone(),
            text: text.into(),
            timestamp: Utc::now(),
        })
    }

    pub fn dispatch_state_changed(session_id: &SessionId, state: DispatchState) -> Self {
        Self::DispatchStateChanged(DispatchStateChangedEvent {
            session_id: session_id.clone(),
            state,
            timestamp: Utc::now(),
        })
    }

    pub fn notice(session_id: &SessionId, kind: NoticeKind, text: impl Into<String>) -> Self {
        Self::Notice(NoticeEvent {
            session_id: session_id.clone(),
            kind,
            text: text.into(),
            timestamp: Utc::now(),
        })
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            ConsultationEvent::MessageAppended(e) => e.event_type(),
            ConsultationEvent::TranscriptReset(e) => e.event_type(),
            ConsultationEvent::RecordingStateChanged(e) => e.event_type(),
            ConsultationEvent::ComposerChanged(e) => e.event_type(),
            ConsultationEvent::DispatchStateChanged(e) => e.event_type(),
            ConsultationEvent::Notice(e) => e.event_type(),
        }
    }
}
