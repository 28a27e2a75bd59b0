use serde::Serialize;

use super::super::value_objects::{MessageId, MessageKind};
use super::ChatMessage;

/// 对话记录
///
/// 只追加的有序序列。唯一的删除途径是 `reset`，用单条初始消息替换全部内容。
/// 每次 `reset` 递增 `epoch`，让在途请求能识别出记录已被替换。
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    #[serde(skip)]
    next_sequence: u64,
    #[serde(skip)]
    epoch: u64,
}

impl Transcript {
    /// 以初始消息创建
    pub fn new(initial: ChatMessage) -> Self {
        Self {
            messages: vec![initial],
            next_sequence: 1,
            epoch: 0,
        }
    }

    /// 生成会话内唯一的消息 ID（序号跨 reset 继续递增）
    pub fn next_id(&mut self, kind: MessageKind) -> MessageId {
        let id = MessageId::generate(kind, self.next_sequence);
        self.next_sequence += 1;
        id
    }

    /// 追加到末尾
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// 替换为单条消息
    pub fn reset(&mut self, initial: ChatMessage) {
        self.messages.clear();
        self.messages.push(initial);
        self.epoch += 1;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn find(&self, id: &MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id() == id)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
