use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 会话唯一标识符
///
/// 值对象：视图挂载时生成一次，生命周期内不变。
/// 格式为 `session_<毫秒时间戳>_<随机后缀>`，时间戳保证同一客户端内有序，
/// 随机后缀避免同一毫秒内并发挂载时碰撞。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// 生成新的会话 ID
    pub fn new() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("session_{}_{}", millis, &suffix[..8]))
    }

    /// 从已有令牌创建（例如由宿主环境恢复）
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// 获取令牌字符串
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}
