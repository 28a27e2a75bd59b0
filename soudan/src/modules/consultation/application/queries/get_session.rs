use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use super::super::{ApplicationError, QueryHandler, SharedSession};
use crate::modules::consultation::domain::{
    ChatMessage, DispatchState, LanguageCatalog, LanguageCode, Phrasebook, RecordingState,
    SessionId, SupportedLanguage,
};

/// 获取会话快照查询
#[derive(Debug, Clone, Default)]
pub struct GetSessionQuery;

/// 渲染层需要的全部状态
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub active_language: LanguageCode,
    pub language: Option<SupportedLanguage>,
    pub messages: Vec<ChatMessage>,
    pub composer: String,
    pub composer_enabled: bool,
    pub placeholder: String,
    pub recording_state: RecordingState,
    /// 录音计时，格式 `MM:SS`
    pub recording_elapsed: Option<String>,
    pub can_start_recording: bool,
    pub dispatch_state: DispatchState,
    pub footer: String,
    pub created_at: DateTime<Utc>,
}

/// 获取会话快照查询处理器
pub struct GetSessionHandler {
    session: SharedSession,
    phrasebook: Arc<Phrasebook>,
}

impl GetSessionHandler {
    pub fn new(session: SharedSession, phrasebook: Arc<Phrasebook>) -> Self {
        Self {
            session,
            phrasebook,
        }
    }
}

#[async_trait]
impl QueryHandler<GetSessionQuery, SessionSnapshot> for GetSessionHandler {
    async fn handle(&self, _query: GetSessionQuery) -> Result<SessionSnapshot, ApplicationError> {
        let session = self.session.read().await;
        let language = session.active_language().clone();
        let recording_state = session.recording_state();

        Ok(SessionSnapshot {
            session_id: session.id().clone(),
            language: LanguageCatalog::find(&language).copied(),
            messages: session.transcript().messages().to_vec(),
            composer: session.composer().to_string(),
            composer_enabled: session.composer_enabled(),
            placeholder: self.phrasebook.placeholder(&language).to_string(),
            recording_state,
            recording_elapsed: recording_state.display_elapsed(),
            can_start_recording: session.can_start_recording(),
            dispatch_state: session.dispatch_state(),
            footer: self.phrasebook.footer(&language).to_string(),
            created_at: session.created_at(),
            active_language: language,
        })
    }
}
