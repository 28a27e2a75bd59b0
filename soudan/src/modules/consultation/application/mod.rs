// Consultation Application Layer - 应用层
// 实现 CQRS 模式的命令和查询处理器，以及录音管线

pub mod commands;
pub mod queries;
pub mod voice_capture;

// 导出命令和查询
pub use commands::*;
pub use queries::*;
pub use voice_capture::*;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use super::domain::ConsultationSession;
use super::ports::{ConsultationError, TranscriptionError};

/// 会话在各处理器之间共享
///
/// 锁只在同步的状态变更期间持有，不跨远端调用
pub type SharedSession = Arc<RwLock<ConsultationSession>>;

/// 应用层错误类型
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Consultation error: {0}")]
    ConsultationError(#[from] ConsultationError),

    #[error("Transcription error: {0}")]
    TranscriptionError(#[from] TranscriptionError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 命令处理器 trait
///
/// 遵循 CQRS 模式，命令处理器负责执行有副作用的操作
#[async_trait]
pub trait CommandHandler<C, R>: Send + Sync
where
    C: Send + Sync,
{
    /// 执行命令
    async fn handle(&self, command: C) -> Result<R, ApplicationError>;
}

/// 查询处理器 trait
///
/// 遵循 CQRS 模式，查询处理器负责只读操作
#[async_trait]
pub trait QueryHandler<Q, R>: Send + Sync
where
    Q: Send + Sync,
{
    /// 执行查询
    async fn handle(&self, query: Q) -> Result<R, ApplicationError>;
}
