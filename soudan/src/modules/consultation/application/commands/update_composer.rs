use async_trait::async_trait;
use std::sync::Arc;

use super::super::{ApplicationError, CommandHandler, SharedSession};
use crate::infrastructure::EventBus;
use crate::modules::consultation::domain::{ConsultationEvent, MessageId};

/// 更新输入框命令
#[derive(Debug, Clone)]
pub struct UpdateComposerCommand {
    pub text: String,
}

impl UpdateComposerCommand {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// 采用建议回复命令
///
/// 把某条助手消息的第 `index` 个建议原样填入输入框
#[derive(Debug, Clone)]
pub struct AdoptSuggestedActionCommand {
    pub message_id: MessageId,
    pub index: usize,
}

impl AdoptSuggestedActionCommand {
    pub fn new(message_id: MessageId, index: usize) -> Self {
        Self { message_id, index }
    }
}

/// 输入框变更响应
#[derive(Debug, Clone)]
pub struct ComposerResponse {
    /// 输入框禁用或建议不存在时为 `false`
    pub accepted: bool,
    pub composer: String,
}

/// 输入框命令处理器
pub struct UpdateComposerHandler {
    session: SharedSession,
    event_bus: Arc<EventBus>,
}

impl UpdateComposerHandler {
    pub fn new(session: SharedSession, event_bus: Arc<EventBus>) -> Self {
        Self { session, event_bus }
    }
}

#[async_trait]
impl CommandHandler<UpdateComposerCommand, ComposerResponse> for UpdateComposerHandler {
    async fn handle(
        &self,
        command: UpdateComposerCommand,
    ) -> Result<ComposerResponse, ApplicationError> {
        let mut session = self.session.write().await;
        let accepted = session.set_composer(command.text);
        if accepted {
            self.event_bus.publish(ConsultationEvent::composer_changed(
                session.id(),
                session.composer(),
            ));
        }

        Ok(ComposerResponse {
            accepted,
            composer: session.composer().to_string(),
        })
    }
}

#[async_trait]
impl CommandHandler<AdoptSuggestedActionCommand, ComposerResponse> for UpdateComposerHandler {
    async fn handle(
        &self,
        command: AdoptSuggestedActionCommand,
    ) -> Result<ComposerResponse, ApplicationError> {
        let mut session = self.session.write().await;
        let adopted = session.adopt_suggested_action(&command.message_id, command.index);
        if let Some(text) = &adopted {
            self.event_bus
                .publish(ConsultationEvent::composer_changed(session.id(), text.as_str()));
        }

        Ok(ComposerResponse {
            accepted: adopted.is_some(),
            composer: session.composer().to_string(),
        })
    }
}
