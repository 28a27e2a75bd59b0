// Consultation Domain Layer
// 领域层包含实体、值对象、领域服务和领域事件

pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;

// 重导出常用类型
pub use entities::{
    ChatMessage, ConsultationSession, MessageRole, PendingDispatch, SkipReason, Transcript,
};
pub use events::*;
pub use services::{PhraseKey, Phrasebook};
pub use value_objects::{
    DispatchState, LanguageCatalog, LanguageCode, MessageId, MessageKind, RecordingState,
    SessionId, SupportedLanguage, Urgency,
};
