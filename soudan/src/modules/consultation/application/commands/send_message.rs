use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::super::{ApplicationError, CommandHandler, SharedSession};
use crate::infrastructure::EventBus;
use crate::modules::consultation::domain::{
    ChatMessage, ConsultationEvent, DispatchState, MessageKind, Phrasebook, SkipReason, Urgency,
};
use crate::modules::consultation::ports::{ActorContext, ConsultationPort, ConsultationRequest};

/// 发送消息命令
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// 用户输入（发送前会去掉首尾空白）
    pub utterance: String,
}

impl SendMessageCommand {
    pub fn new(utterance: impl Into<String>) -> Self {
        Self {
            utterance: utterance.into(),
        }
    }
}

/// 发送结果
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// 前置条件不满足，什么都没有发生
    Skipped(SkipReason),
    /// 远端返回了结果
    Answered {
        user_message: ChatMessage,
        assistant_message: ChatMessage,
        /// 紧急程度为 critical 时追加的急救指引
        escalation: Option<ChatMessage>,
    },
    /// 远端调用失败，已追加道歉消息
    Failed {
        user_message: ChatMessage,
        apology: ChatMessage,
    },
    /// 等待期间切换了语言，结果被丢弃
    Discarded { user_message: ChatMessage },
}

impl SendOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, SendOutcome::Skipped(_))
    }
}

/// 发送消息命令处理器
pub struct SendMessageHandler {
    session: SharedSession,
    consultation: Arc<dyn ConsultationPort>,
    actors: Arc<dyn ActorContext>,
    phrasebook: Arc<Phrasebook>,
    event_bus: Arc<EventBus>,
}

impl SendMessageHandler {
    pub fn new(
        session: SharedSession,
        consultation: Arc<dyn ConsultationPort>,
        actors: Arc<dyn ActorContext>,
        phrasebook: Arc<Phrasebook>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            session,
            consultation,
            actors,
            phrasebook,
            event_bus,
        }
    }
}

#[async_trait]
impl CommandHandler<SendMessageCommand, SendOutcome> for SendMessageHandler {
    async fn handle(&self, command: SendMessageCommand) -> Result<SendOutcome, ApplicationError> {
        if command.utterance.trim().is_empty() {
            return Ok(SendOutcome::Skipped(SkipReason::EmptyUtterance));
        }

        let actor = match self.actors.current_actor().await {
            Some(actor) if actor.can_consult() => actor,
            _ => {
                debug!("[SendMessage] No authenticated actor, ignoring send");
                return Ok(SendOutcome::Skipped(SkipReason::NoActor));
            }
        };

        // 追加用户消息并进入 Sending
        let (session_id, pending) = {
            let mut session = self.session.write().await;
            let pending = match session.begin_dispatch(&command.utterance) {
                Ok(pending) => pending,
                Err(reason) => {
                    debug!("[SendMessage] Skipped: {:?}", reason);
                    return Ok(SendOutcome::Skipped(reason));
                }
            };
            let session_id = session.id().clone();

            self.event_bus.publish(ConsultationEvent::message_appended(
                &session_id,
                &pending.user_message,
            ));
            self.event_bus
                .publish(ConsultationEvent::composer_changed(&session_id, ""));
            self.event_bus.publish(ConsultationEvent::dispatch_state_changed(
                &session_id,
                DispatchState::Sending,
            ));
            (session_id, pending)
        };

        let request = ConsultationRequest {
            actor_id: actor.id.clone(),
            message: pending.utterance.clone(),
            language: pending.language.code().to_string(),
            session_id: session_id.as_str().to_string(),
        };

        info!(
            "[SendMessage] Consulting via {} (session={}, language={}, {} chars)",
            self.consultation.service_id(),
            session_id,
            pending.language,
            pending.utterance.chars().count()
        );
        let result = self.consultation.consult(request).await;

        let mut session = self.session.write().await;
        let current = session.finish_dispatch(pending.epoch);

        let outcome = if !current {
            info!("[SendMessage] Transcript was reset while waiting, dropping response");
            SendOutcome::Discarded {
                user_message: pending.user_message,
            }
        } else {
            let language = pending.language.clone();
            match result {
                Ok(result) => {
                    let assistant_message = session.append_assistant(
                        result.display_text(),
                        language.clone(),
                        result.urgency,
                        result.suggested_actions.clone(),
                    );
                    self.event_bus.publish(ConsultationEvent::message_appended(
                        &session_id,
                        &assistant_message,
                    ));

                    let escalation = if result.urgency.is_critical() {
                        warn!("[SendMessage] Critical urgency, appending emergency guidance");
                        let guidance = session.append_synthetic(
                            MessageKind::Emergency,
                            self.phrasebook.emergency_guidance(&language),
                            language,
                            Some(Urgency::Critical),
                        );
                        self.event_bus
                            .publish(ConsultationEvent::message_appended(&session_id, &guidance));
                        Some(guidance)
                    } else {
                        None
                    };

                    SendOutcome::Answered {
                        user_message: pending.user_message,
                        assistant_message,
                        escalation,
                    }
                }
                Err(e) => {
                    warn!("[SendMessage] Consultation failed: {}", e);
                    let apology = session.append_synthetic(
                        MessageKind::Error,
                        self.phrasebook.retry_apology(&language),
                        language,
                        None,
                    );
                    self.event_bus
                        .publish(ConsultationEvent::message_appended(&session_id, &apology));

                    SendOutcome::Failed {
                        user_message: pending.user_message,
                        apology,
                    }
                }
            }
        };

        self.event_bus.publish(ConsultationEvent::dispatch_state_changed(
            &session_id,
            DispatchState::Idle,
        ));

        Ok(outcome)
    }
}
