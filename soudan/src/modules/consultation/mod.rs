// Consultation Module - 多语言 AI 咨询模块
//
// 实现六边形架构（Hexagonal Architecture）：
// - domain: 领域层，包含会话、消息记录、语言目录和本地化文本
// - ports: 端口层，定义远端咨询、语音识别、麦克风和用户上下文接口
// - infrastructure: 基础设施层，HTTP 适配器和测试用实现
// - application: 应用层，实现 CQRS 命令和查询处理器以及录音管线

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型
pub use application::{
    // Traits
    ApplicationError,
    CommandHandler,
    QueryHandler,
    SharedSession,
    // Commands
    AdoptSuggestedActionCommand,
    ChangeLanguageCommand,
    ChangeLanguageHandler,
    ChangeLanguageResponse,
    ComposerResponse,
    SendMessageCommand,
    SendMessageHandler,
    SendOutcome,
    UpdateComposerCommand,
    UpdateComposerHandler,
    // Queries
    GetSessionHandler,
    GetSessionQuery,
    LanguageOption,
    ListLanguagesHandler,
    ListLanguagesQuery,
    ListMessagesHandler,
    ListMessagesQuery,
    SessionSnapshot,
    // Voice capture
    CaptureOutcome,
    CaptureSettings,
    StartOutcome,
    StopReason,
    ToggleOutcome,
    VoiceCapturePipeline,
};

pub use domain::{
    ChatMessage, ConsultationEvent, ConsultationSession, DispatchState, LanguageCatalog,
    LanguageCode, MessageId, MessageKind, MessageRole, NoticeKind, Phrasebook, RecordingState,
    SessionId, SkipReason, SupportedLanguage, Urgency,
};

pub use infrastructure::{
    DeviceStats, FakeAudioDevice, HttpConsultationAdapter, HttpTranscriptionAdapter,
    ScriptedConsultationAdapter, ScriptedTranscriptionAdapter, UnsupportedAudioDevice,
};

pub use ports::{
    Actor, ActorContext, AudioClip, AudioDevice, AudioInput, ConsultationError, ConsultationPort,
    ConsultationRequest, ConsultationResult, DeviceError, TranscriptionError, TranscriptionPort,
    TranscriptionResponse,
};

use futures::Stream;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::infrastructure::{AppEvent, EventBus};
use crate::modules::config::AppConfig;

/// 模块依赖的外部协作方
#[derive(Clone)]
pub struct ConsultationPorts {
    pub consultation: Arc<dyn ConsultationPort>,
    pub transcription: Arc<dyn TranscriptionPort>,
    pub audio_device: Arc<dyn AudioDevice>,
    pub actors: Arc<dyn ActorContext>,
}

/// Consultation 模块容器
///
/// 一个实例对应一次聊天视图的生命周期：创建时生成会话，丢弃即销毁
pub struct ConsultationModule {
    session: SharedSession,
    event_bus: Arc<EventBus>,
    // Handlers
    send_message_handler: SendMessageHandler,
    change_language_handler: ChangeLanguageHandler,
    update_composer_handler: UpdateComposerHandler,
    get_session_handler: GetSessionHandler,
    list_messages_handler: ListMessagesHandler,
    list_languages_handler: ListLanguagesHandler,
    // Voice
    voice_capture: Arc<VoiceCapturePipeline>,
}

impl ConsultationModule {
    /// 使用自定义端口创建
    ///
    /// # Errors
    /// 配置无效（例如默认语言不在目录中）时返回 `ValidationError`
    pub fn new(
        config: &AppConfig,
        ports: ConsultationPorts,
        event_bus: Arc<EventBus>,
    ) -> Result<Self, ApplicationError> {
        config
            .validate()
            .map_err(|errors| ApplicationError::ValidationError(errors.join("; ")))?;

        let default_language = config.consultation.default_language_code();
        let phrasebook = Arc::new(Phrasebook::builtin_with_default(default_language.clone()));
        let session =
            ConsultationSession::new(default_language.clone(), phrasebook.welcome(&default_language));
        tracing::info!(
            "[ConsultationModule] Session {} created (language={})",
            session.id(),
            default_language
        );
        let session: SharedSession = Arc::new(RwLock::new(session));

        let send_message_handler = SendMessageHandler::new(
            session.clone(),
            ports.consultation,
            ports.actors,
            phrasebook.clone(),
            event_bus.clone(),
        );
        let change_language_handler =
            ChangeLanguageHandler::new(session.clone(), phrasebook.clone(), event_bus.clone());
        let update_composer_handler = UpdateComposerHandler::new(session.clone(), event_bus.clone());
        let get_session_handler = GetSessionHandler::new(session.clone(), phrasebook);
        let list_messages_handler = ListMessagesHandler::new(session.clone());
        let list_languages_handler = ListLanguagesHandler::new(session.clone());
        let voice_capture = Arc::new(VoiceCapturePipeline::new(
            session.clone(),
            ports.audio_device,
            ports.transcription,
            event_bus.clone(),
            CaptureSettings::from(&config.consultation),
        ));

        Ok(Self {
            session,
            event_bus,
            send_message_handler,
            change_language_handler,
            update_composer_handler,
            get_session_handler,
            list_messages_handler,
            list_languages_handler,
            voice_capture,
        })
    }

    /// 使用 HTTP 远端服务创建
    ///
    /// # Errors
    /// 服务地址为空或 HTTP 客户端无法创建时返回错误
    pub fn with_http(
        config: &AppConfig,
        audio_device: Arc<dyn AudioDevice>,
        actors: Arc<dyn ActorContext>,
        event_bus: Arc<EventBus>,
    ) -> Result<Self, ApplicationError> {
        let ports = ConsultationPorts {
            consultation: Arc::new(HttpConsultationAdapter::new(&config.service)?),
            transcription: Arc::new(HttpTranscriptionAdapter::new(&config.service)?),
            audio_device,
            actors,
        };
        Self::new(config, ports, event_bus)
    }

    /// 会话 ID
    pub async fn session_id(&self) -> SessionId {
        self.session.read().await.id().clone()
    }

    /// 订阅渲染事件
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_bus.subscribe()
    }

    /// 以 `Stream` 形式订阅渲染事件
    pub fn events(&self) -> impl Stream<Item = AppEvent> + Send + 'static {
        self.event_bus.stream()
    }

    // Command handlers

    /// 发送消息
    pub async fn send(&self, utterance: impl Into<String>) -> Result<SendOutcome, ApplicationError> {
        self.send_message_handler
            .handle(SendMessageCommand::new(utterance))
            .await
    }

    /// 发送当前输入框内容
    pub async fn send_composer(&self) -> Result<SendOutcome, ApplicationError> {
        let text = self.session.read().await.composer().to_string();
        self.send(text).await
    }

    /// 切换语言
    pub async fn change_language(
        &self,
        language: impl Into<LanguageCode>,
    ) -> Result<ChangeLanguageResponse, ApplicationError> {
        self.change_language_handler
            .handle(ChangeLanguageCommand::new(language))
            .await
    }

    /// 更新输入框
    pub async fn update_composer(
        &self,
        text: impl Into<String>,
    ) -> Result<ComposerResponse, ApplicationError> {
        self.update_composer_handler
            .handle(UpdateComposerCommand::new(text))
            .await
    }

    /// 采用建议回复
    pub async fn adopt_suggested_action(
        &self,
        message_id: MessageId,
        index: usize,
    ) -> Result<ComposerResponse, ApplicationError> {
        self.update_composer_handler
            .handle(AdoptSuggestedActionCommand::new(message_id, index))
            .await
    }

    // Voice capture

    pub async fn start_recording(&self) -> StartOutcome {
        self.voice_capture.start().await
    }

    pub async fn stop_recording(&self) -> CaptureOutcome {
        self.voice_capture.stop().await
    }

    /// 录音按钮：空闲时开始，录音中停止
    pub async fn toggle_recording(&self) -> ToggleOutcome {
        self.voice_capture.toggle().await
    }

    /// 关闭聊天视图：放弃进行中的录音并释放麦克风
    pub async fn close(&self) {
        self.voice_capture.cancel().await;
    }

    // Query handlers

    /// 渲染快照
    pub async fn snapshot(&self) -> Result<SessionSnapshot, ApplicationError> {
        self.get_session_handler.handle(GetSessionQuery).await
    }

    /// 会话消息（按插入顺序）
    pub async fn messages(&self) -> Result<Vec<ChatMessage>, ApplicationError> {
        self.list_messages_handler
            .handle(ListMessagesQuery::all())
            .await
    }

    /// 语言选择器
    pub async fn languages(&self) -> Result<Vec<LanguageOption>, ApplicationError> {
        self.list_languages_handler.handle(ListLanguagesQuery).await
    }
}

impl Drop for ConsultationModule {
    /// 视图卸载时未调用 `close` 也要释放麦克风
    fn drop(&mut self) {
        if !self.voice_capture.abandon() {
            tracing::warn!("[ConsultationModule] Recording slot busy while dropping module");
        }
    }
}
