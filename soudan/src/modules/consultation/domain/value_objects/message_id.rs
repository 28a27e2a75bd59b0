use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 消息来源种类，决定 ID 前缀
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// 切换语言后生成的欢迎语
    Welcome,
    /// 用户输入
    User,
    /// 咨询服务的回复
    Assistant,
    /// 紧急升级提示
    Emergency,
    /// 调用失败时的重试提示
    Error,
}

impl MessageKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            MessageKind::Welcome => "welcome",
            MessageKind::User => "user",
            MessageKind::Assistant => "assistant",
            MessageKind::Emergency => "emergency",
            MessageKind::Error => "error",
        }
    }
}

/// 消息唯一标识符
///
/// 值对象：`<前缀>_<毫秒时间戳>_<会话内序号>`。
/// 同一毫秒内可能追加多条消息（回复 + 紧急提示），序号保证会话内不重复。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// 按种类和会话内序号生成
    pub fn generate(kind: MessageKind, sequence: u64) -> Self {
        Self(format!(
            "{}_{}_{}",
            kind.prefix(),
            Utc::now().timestamp_millis(),
            sequence
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 解析出前缀对应的种类
    pub fn kind(&self) -> Option<MessageKind> {
        let prefix = self.0.split('_').next()?;
        match prefix {
            "welcome" => Some(MessageKind::Welcome),
            "user" => Some(MessageKind::User),
            "assistant" => Some(MessageKind::Assistant),
            "emergency" => Some(MessageKind::Emergency),
            "error" => Some(MessageKind::Error),
            _ => None,
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_prefix() {
        let id = MessageId::generate(MessageKind::Emergency, 7);
        assert!(id.as_str().starts_with("emergency_"));
        assert!(id.as_str().ends_with("_7"));
        assert_eq!(id.kind(), Some(MessageKind::Emergency));
    }

    #[test]
    fn test_same_millisecond_ids_differ_by_sequence() {
        let a = MessageId::generate(MessageKind::Assistant, 1);
        let b = MessageId::generate(MessageKind::Assistant, 2);
        assert_ne!(a, b);
    }
}
