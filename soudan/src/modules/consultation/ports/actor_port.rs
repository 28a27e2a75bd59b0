use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 已认证的用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub user_type: Option<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            user_type: None,
        }
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    /// 唯一的能力检查：任何已认证用户都可以咨询
    pub fn can_consult(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// 用户上下文端口 - 由认证模块提供当前用户
#[async_trait]
pub trait ActorContext: Send + Sync {
    async fn current_actor(&self) -> Option<Actor>;
}
