use chrono::{DateTime, Utc};
use serde::Serialize;

use super::super::value_objects::{
    DispatchState, LanguageCode, MessageId, MessageKind, RecordingState, SessionId, Urgency,
};
use super::{ChatMessage, Transcript};

/// 发送被静默跳过的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// 去除空白后为空
    EmptyUtterance,
    /// 已有请求在途
    AlreadySending,
    /// 没有已认证的用户
    NoActor,
    /// 录音或语音识别进行中
    Recording,
}

/// 已进入在途状态的发送
#[derive(Debug, Clone)]
pub struct PendingDispatch {
    pub user_message: ChatMessage,
    /// 去除首尾空白后的原文
    pub utterance: String,
    pub language: LanguageCode,
    /// 发起时的对话记录代数
    pub epoch: u64,
}

/// 咨询会话 - 聚合根
///
/// 视图挂载时创建、卸载时丢弃，不做持久化。
/// 对话记录、发送标签、录音状态和输入框内容都只通过这里的方法变更。
#[derive(Debug, Clone)]
pub struct ConsultationSession {
    id: SessionId,
    active_language: LanguageCode,
    transcript: Transcript,
    dispatch: DispatchState,
    recording: RecordingState,
    /// 输入框内容
    composer: String,
    created_at: DateTime<Utc>,
}

impl ConsultationSession {
    /// 创建新会话，对话记录以欢迎语开头
    pub fn new(language: LanguageCode, welcome_text: impl Into<String>) -> Self {
        let welcome = ChatMessage::new_synthetic(
            MessageId::generate(MessageKind::Welcome, 0),
            welcome_text,
            language.clone(),
            None,
        );
        Self {
            id: SessionId::new(),
            active_language: language,
            transcript: Transcript::new(welcome),
            dispatch: DispatchState::Idle,
            recording: RecordingState::Idle,
            composer: String::new(),
            created_at: Utc::now(),
        }
    }

    // Getters
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn active_language(&self) -> &LanguageCode {
        &self.active_language
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn dispatch_state(&self) -> DispatchState {
        self.dispatch
    }

    pub fn recording_state(&self) -> RecordingState {
        self.recording
    }

    pub fn composer(&self) -> &str {
        &self.composer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 录音、识别或发送进行中时输入框禁用
    pub fn composer_enabled(&self) -> bool {
        self.recording.is_idle() && !self.dispatch.is_sending()
    }

    /// 录音按钮只在空闲且没有在途发送时可以开始
    pub fn can_start_recording(&self) -> bool {
        self.recording.is_idle() && !self.dispatch.is_sending()
    }

    // 语言

    /// 切换活动语言并把对话记录重置为新语言的欢迎语
    pub fn change_language(
        &mut self,
        language: LanguageCode,
        welcome_text: impl Into<String>,
    ) -> ChatMessage {
        let id = self.transcript.next_id(MessageKind::Welcome);
        let welcome = ChatMessage::new_synthetic(id, welcome_text, language.clone(), None);
        self.active_language = language;
        self.transcript.reset(welcome.clone());
        welcome
    }

    // 发送

    /// 进入在途状态：追加用户消息、清空输入框
    pub fn begin_dispatch(&mut self, utterance: &str) -> Result<PendingDispatch, SkipReason> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(SkipReason::EmptyUtterance);
        }
        if self.dispatch.is_sending() {
            return Err(SkipReason::AlreadySending);
        }
        if !self.recording.is_idle() {
            return Err(SkipReason::Recording);
        }

        let id = self.transcript.next_id(MessageKind::User);
        let user_message = ChatMessage::new_user(id, utterance, self.active_language.clone());
        self.transcript.append(user_message.clone());
        self.composer.clear();
        self.dispatch = DispatchState::Sending;

        Ok(PendingDispatch {
            user_message,
            utterance: utterance.to_string(),
            language: self.active_language.clone(),
            epoch: self.transcript.epoch(),
        })
    }

    /// 结束在途状态，返回发起时的对话记录是否仍然有效
    pub fn finish_dispatch(&mut self, epoch: u64) -> bool {
        self.dispatch = DispatchState::Idle;
        self.transcript.epoch() == epoch
    }

    /// 追加咨询服务的回复
    pub fn append_assistant(
        &mut self,
        content: impl Into<String>,
        language: LanguageCode,
        urgency: Urgency,
        suggested_actions: Option<Vec<String>>,
    ) -> ChatMessage {
        let id = self.transcript.next_id(MessageKind::Assistant);
        let message = ChatMessage::new_assistant(id, content, language, urgency, suggested_actions);
        self.transcript.append(message.clone());
        message
    }

    /// 追加本地合成的提示
    pub fn append_synthetic(
        &mut self,
        kind: MessageKind,
        content: impl Into<String>,
        language: LanguageCode,
        urgency: Option<Urgency>,
    ) -> ChatMessage {
        let id = self.transcript.next_id(kind);
        let message = ChatMessage::new_synthetic(id, content, language, urgency);
        self.transcript.append(message.clone());
        message
    }

    // 录音

    /// `Idle → Recording`，计时归零
    pub fn begin_recording(&mut self) -> bool {
        if !self.can_start_recording() {
            return false;
        }
        self.recording = RecordingState::Recording { elapsed_secs: 0 };
        true
    }

    /// 录音中更新计时（秒），返回新的计时；不在录音时返回 `None`
    pub fn record_elapsed(&mut self, elapsed_secs: u32) -> Option<u32> {
        match self.recording {
            RecordingState::Recording { .. } => {
                self.recording = RecordingState::Recording { elapsed_secs };
                Some(elapsed_secs)
            }
            _ => None,
        }
    }

    /// `Recording → Transcribing`
    pub fn begin_transcribing(&mut self) -> bool {
        if !self.recording.is_recording() {
            return false;
        }
        self.recording = RecordingState::Transcribing;
        true
    }

    /// 回到 `Idle`；识别成功时用结果覆盖输入框
    pub fn finish_transcription(&mut self, text: Option<String>) {
        self.recording = RecordingState::Idle;
        if let Some(text) = text {
            self.composer = text;
        }
    }

    /// 设备获取失败或录音被放弃时直接回到 `Idle`
    pub fn abort_recording(&mut self) {
        self.recording = RecordingState::Idle;
    }

    // 输入框

    /// 用户编辑输入框；禁用时忽略
    pub fn set_composer(&mut self, text: impl Into<String>) -> bool {
        if !self.composer_enabled() {
            return false;
        }
        self.composer = text.into();
        true
    }

    /// 把推荐操作原样填入输入框
    pub fn adopt_suggested_action(&mut self, message_id: &MessageId, index: usize) -> Option<String> {
        if !self.composer_enabled() {
            return None;
        }
        let action = self
            .transcript
            .find(message_id)?
            .suggested_actions()?
            .get(index)?
            .clone();
        self.composer = action.clone();
        Some(action)
    }
}
