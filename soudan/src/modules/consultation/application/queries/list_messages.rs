use async_trait::async_trait;

use super::super::{ApplicationError, QueryHandler, SharedSession};
use crate::modules::consultation::domain::ChatMessage;

/// 列出会话消息查询
#[derive(Debug, Clone, Default)]
pub struct ListMessagesQuery {
    /// 只返回最后 `limit` 条
    pub limit: Option<usize>,
}

impl ListMessagesQuery {
    pub fn all() -> Self {
        Self { limit: None }
    }

    pub fn latest(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

/// 列出会话消息查询处理器
pub struct ListMessagesHandler {
    session: SharedSession,
}

impl ListMessagesHandler {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl QueryHandler<ListMessagesQuery, Vec<ChatMessage>> for ListMessagesHandler {
    async fn handle(&self, query: ListMessagesQuery) -> Result<Vec<ChatMessage>, ApplicationError> {
        let session = self.session.read().await;
        let messages = session.transcript().messages();
        let start = query
            .limit
            .map(|limit| messages.len().saturating_sub(limit))
            .unwrap_or(0);
        Ok(messages[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::consultation::domain::{ConsultationSession, LanguageCode, Urgency};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[tokio::test]
    async fn test_list_messages_in_insertion_order() {
        let session = Arc::new(RwLock::new(ConsultationSession::new(
            LanguageCode::from("en"),
            "Hello!",
        )));
        {
            let mut session = session.write().await;
            let pending = session.begin_dispatch("first").unwrap();
            session.finish_dispatch(pending.epoch);
            session.append_assistant("second", LanguageCode::from("en"), Urgency::None, None);
        }
        let handler = ListMessagesHandler::new(session);

        let all = handler.handle(ListMessagesQuery::all()).await.unwrap();
        let contents: Vec<&str> = all.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["Hello!", "first", "second"]);

        let latest = handler.handle(ListMessagesQuery::latest(2)).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].content(), "first");

        let more = handler.handle(ListMessagesQuery::latest(10)).await.unwrap();
        assert_eq!(more.len(), 3);
    }
}
