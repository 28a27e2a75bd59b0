pub mod commands;
pub mod infrastructure;
pub mod modules;
pub mod shared;

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use infrastructure::{AppState, EventBus};
use modules::consultation::AudioDevice;
use modules::{ConfigModule, ConsultationModule};
use shared::AppResult;

/// 初始化日志
///
/// 读取 `RUST_LOG`，默认 `info`；重复调用不会报错
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// 应用根：持有全局状态、事件总线和配置模块
///
/// 每打开一次聊天视图调用一次 `open_consultation`
pub struct Soudan {
    state: AppState,
    event_bus: Arc<EventBus>,
    config: ConfigModule,
}

impl Soudan {
    /// 配置保存在 `data_dir` 下的 JSON 文件中
    pub fn new(data_dir: PathBuf) -> Self {
        tracing::info!("Soudan starting, data directory: {:?}", data_dir);
        let event_bus = Arc::new(EventBus::new());
        Self {
            state: AppState::new(),
            config: ConfigModule::new_with_file(data_dir).with_event_bus(event_bus.clone()),
            event_bus,
        }
    }

    /// 配置只保存在内存中
    pub fn in_memory() -> Self {
        let event_bus = Arc::new(EventBus::new());
        Self {
            state: AppState::new(),
            config: ConfigModule::new_in_memory().with_event_bus(event_bus.clone()),
            event_bus,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn config(&self) -> &ConfigModule {
        &self.config
    }

    /// 按当前配置创建一次咨询会话，远端服务走 HTTP
    pub async fn open_consultation(
        &self,
        audio_device: Arc<dyn AudioDevice>,
    ) -> AppResult<ConsultationModule> {
        let config = self.config.get_all().await?;
        let module = ConsultationModule::with_http(
            &config,
            audio_device,
            Arc::new(self.state.clone()),
            self.event_bus.clone(),
        )?;
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::AppEvent;
    use crate::modules::config::{PartialAppConfig, PartialServiceConfig};
    use crate::modules::consultation::{SendOutcome, SkipReason, UnsupportedAudioDevice};

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }

    #[tokio::test]
    async fn test_open_consultation_uses_current_config() {
        let app = Soudan::in_memory();
        let module = app
            .open_consultation(Arc::new(UnsupportedAudioDevice))
            .await
            .unwrap();
        let snapshot = module.snapshot().await.unwrap();
        assert_eq!(snapshot.active_language.code(), "ja");

        // 未登录时发送被忽略，不会访问网络
        let outcome = module.send("こんにちは").await.unwrap();
        assert!(matches!(outcome, SendOutcome::Skipped(SkipReason::NoActor)));
    }

    #[tokio::test]
    async fn test_config_changes_reach_event_bus() {
        let app = Soudan::in_memory();
        let mut rx = app.event_bus().subscribe();

        app.config()
            .update(PartialAppConfig {
                service: Some(PartialServiceConfig {
                    base_url: Some("https://portal.example".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(matches!(rx.recv().await.unwrap(), AppEvent::ConfigChanged(_)));
    }
}
