use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::super::{ApplicationError, CommandHandler, SharedSession};
use crate::infrastructure::EventBus;
use crate::modules::consultation::domain::{
    ChatMessage, ConsultationEvent, LanguageCatalog, LanguageCode, Phrasebook,
};

/// 切换语言命令
#[derive(Debug, Clone)]
pub struct ChangeLanguageCommand {
    pub language: LanguageCode,
}

impl ChangeLanguageCommand {
    pub fn new(language: impl Into<LanguageCode>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

/// 切换语言响应
#[derive(Debug, Clone)]
pub struct ChangeLanguageResponse {
    /// 新的欢迎消息；语言未变化时为 `None`
    pub welcome: Option<ChatMessage>,
}

impl ChangeLanguageResponse {
    pub fn changed(&self) -> bool {
        self.welcome.is_some()
    }
}

/// 切换语言命令处理器
///
/// 切换后会话记录被重置为一条本地化欢迎消息
pub struct ChangeLanguageHandler {
    session: SharedSession,
    phrasebook: Arc<Phrasebook>,
    event_bus: Arc<EventBus>,
}

impl ChangeLanguageHandler {
    pub fn new(session: SharedSession, phrasebook: Arc<Phrasebook>, event_bus: Arc<EventBus>) -> Self {
        Self {
            session,
            phrasebook,
            event_bus,
        }
    }
}

#[async_trait]
impl CommandHandler<ChangeLanguageCommand, ChangeLanguageResponse> for ChangeLanguageHandler {
    async fn handle(
        &self,
        command: ChangeLanguageCommand,
    ) -> Result<ChangeLanguageResponse, ApplicationError> {
        let language = command.language;
        if !LanguageCatalog::is_supported(&language) {
            return Err(ApplicationError::UnsupportedLanguage(
                language.code().to_string(),
            ));
        }

        let mut session = self.session.write().await;
        if session.active_language() == &language {
            return Ok(ChangeLanguageResponse { welcome: None });
        }

        let previous = session.active_language().clone();
        let welcome = session.change_language(language.clone(), self.phrasebook.welcome(&language));
        info!(
            "[ChangeLanguage] {} -> {}, transcript reset",
            previous, language
        );

        self.event_bus
            .publish(ConsultationEvent::transcript_reset(session.id(), &welcome));

        Ok(ChangeLanguageResponse {
            welcome: Some(welcome),
        })
    }
}
