// Config Service
//
// 配置服务门面，提供统一的 API

use std::sync::Arc;

use crate::infrastructure::EventBus;
use crate::modules::config::domain::{AppConfig, PartialAppConfig};
use crate::modules::config::ports::{ConfigError, ConfigRepository};

/// 配置服务实现
pub struct ConfigService {
    repository: Arc<dyn ConfigRepository>,
    event_bus: Option<Arc<EventBus>>,
}

impl ConfigService {
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            repository,
            event_bus: None,
        }
    }

    /// 配置变更后向事件总线广播
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// 获取仓储引用
    pub fn repository(&self) -> &Arc<dyn ConfigRepository> {
        &self.repository
    }

    /// 获取全部配置
    pub async fn get_all(&self) -> Result<AppConfig, ConfigError> {
        self.repository.load().await
    }

    /// 合并部分更新，校验通过后才会写入
    pub async fn update(&self, partial: PartialAppConfig) -> Result<AppConfig, ConfigError> {
        let mut config = self.repository.load().await?;
        config.merge(partial);

        if let Err(errors) = config.validate() {
            tracing::warn!("[ConfigService] Rejected config update: {:?}", errors);
            return Err(ConfigError::ValidationError { errors });
        }

        self.repository.save(&config).await?;
        self.notify(&config);

        Ok(config)
    }

    /// 清除已保存的配置并返回默认值
    pub async fn reset(&self) -> Result<AppConfig, ConfigError> {
        self.repository.clear().await?;
        let config = self.repository.load().await?;
        self.notify(&config);

        Ok(config)
    }

    fn notify(&self, config: &AppConfig) {
        if let Some(event_bus) = &self.event_bus {
            event_bus.publish(crate::infrastructure::AppEvent::ConfigChanged(Box::new(
                config.clone(),
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::AppEvent;
    use crate::modules::config::domain::{PartialConsultationConfig, PartialServiceConfig};
    use crate::modules::config::infrastructure::InMemoryConfigRepository;

    #[tokio::test]
    async fn test_config_service() {
        let repo = Arc::new(InMemoryConfigRepository::new());
        let service = ConfigService::new(repo);

        let config = service.get_all().await.unwrap();
        assert_eq!(config.consultation.default_language, "ja");

        let updated = service
            .update(PartialAppConfig {
                consultation: Some(PartialConsultationConfig {
                    default_language: Some("vi".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.consultation.default_language, "vi");

        let reset = service.reset().await.unwrap();
        assert_eq!(reset.consultation.default_language, "ja");
    }

    #[tokio::test]
    async fn test_invalid_update_is_not_saved() {
        let repo = Arc::new(InMemoryConfigRepository::new());
        let service = ConfigService::new(repo);

        let result = service
            .update(PartialAppConfig {
                service: Some(PartialServiceConfig {
                    timeout_secs: Some(0),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
        assert_eq!(service.get_all().await.unwrap().service.timeout_secs, 60);
    }

    #[tokio::test]
    async fn test_update_publishes_config_changed() {
        let bus = Arc::new(EventBus::new());
        let mut rx = bus.subscribe();
        let service =
            ConfigService::new(Arc::new(InMemoryConfigRepository::new()))
                .with_event_bus(bus.clone());

        service
            .update(PartialAppConfig {
                consultation: Some(PartialConsultationConfig {
                    max_recording_secs: Some(45),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await
            .unwrap();

        match rx.recv().await.unwrap() {
            AppEvent::ConfigChanged(config) => {
                assert_eq!(config.consultation.max_recording_secs, 45)
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
