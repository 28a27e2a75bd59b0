use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::modules::consultation::ports::{Actor, ActorContext};

/// 应用全局状态
///
/// 保存认证模块写入的当前用户；咨询模块只通过 `ActorContext` 读取
#[derive(Clone, Default)]
pub struct AppState {
    current_actor: Arc<RwLock<Option<Actor>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已登录用户创建
    pub fn with_actor(actor: Actor) -> Self {
        Self {
            current_actor: Arc::new(RwLock::new(Some(actor))),
        }
    }

    pub async fn sign_in(&self, actor: Actor) {
        tracing::info!("[AppState] Actor signed in: {}", actor.id);
        *self.current_actor.write().await = Some(actor);
    }

    pub async fn sign_out(&self) {
        tracing::info!("[AppState] Actor signed out");
        *self.current_actor.write().await = None;
    }
}

#[async_trait]
impl ActorContext for AppState {
    async fn current_actor(&self) -> Option<Actor> {
        self.current_actor
            .read()
            .await
            .clone()
            .filter(|actor| actor.can_consult())
    }
}
