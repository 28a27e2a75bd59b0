use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::value_objects::{LanguageCode, MessageId, MessageKind, Urgency};

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// 用户消息
    User,
    /// AI 助手消息（含本地合成的提示）
    Assistant,
}

/// 对话记录中的一条消息
///
/// 创建后不可变；语言固定为创建时的活动语言，后续切换语言不会重新翻译
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    id: MessageId,
    role: MessageRole,
    /// 展示文本（已本地化）
    content: String,
    /// 仅用于展示排序和格式化
    timestamp: DateTime<Utc>,
    language: LanguageCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    urgency: Option<Urgency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_actions: Option<Vec<String>>,
}

impl ChatMessage {
    /// 创建用户消息
    pub fn new_user(id: MessageId, content: impl Into<String>, language: LanguageCode) -> Self {
        Self {
            id,
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            language,
            urgency: None,
            suggested_actions: None,
        }
    }

    /// 创建咨询服务返回的助手消息
    pub fn new_assistant(
        id: MessageId,
        content: impl Into<String>,
        language: LanguageCode,
        urgency: Urgency,
        suggested_actions: Option<Vec<String>>,
    ) -> Self {
        Self {
            id,
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            language,
            urgency: Some(urgency),
            suggested_actions,
        }
    }

    /// 创建本地合成的助手消息（欢迎语、紧急提示、重试提示）
    pub fn new_synthetic(
        id: MessageId,
        content: impl Into<String>,
        language: LanguageCode,
        urgency: Option<Urgency>,
    ) -> Self {
        Self {
            id,
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            language,
            urgency,
            suggested_actions: None,
        }
    }

    // Getters
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn language(&self) -> &LanguageCode {
        &self.language
    }

    pub fn urgency(&self) -> Option<Urgency> {
        self.urgency
    }

    pub fn suggested_actions(&self) -> Option<&[String]> {
        self.suggested_actions.as_deref()
    }

    pub fn kind(&self) -> Option<MessageKind> {
        self.id.kind()
    }

    pub fn is_critical(&self) -> bool {
        self.urgency.is_some_and(|u| u.is_critical())
    }
}
