// Config Module
//
// 配置管理模块，采用六边形架构
//
// 层次结构:
// - domain: 领域层，包含配置结构、默认值和校验
// - ports: 端口层，定义配置读写的抽象接口
// - infrastructure: 基础设施层，内存与 JSON 文件两种仓储
// - application: 应用层，配置服务门面

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型

// Domain
pub use domain::{
    AppConfig, ConsultationConfig, PartialAppConfig, PartialConsultationConfig,
    PartialServiceConfig, ServiceConfig,
};

// Ports
pub use ports::{ConfigError, ConfigRepository};

// Infrastructure
pub use infrastructure::{InMemoryConfigRepository, JsonFileConfigRepository};

// Application
pub use application::ConfigService;

use std::sync::Arc;

use crate::infrastructure::EventBus;

/// Config 模块容器
///
/// 管理模块内的依赖注入
pub struct ConfigModule {
    service: ConfigService,
}

impl ConfigModule {
    /// 使用内存仓储创建（用于测试）
    pub fn new_in_memory() -> Self {
        let repository = Arc::new(InMemoryConfigRepository::new());
        Self {
            service: ConfigService::new(repository),
        }
    }

    /// 使用 JSON 文件存储创建
    pub fn new_with_file(data_dir: std::path::PathBuf) -> Self {
        let repository = Arc::new(JsonFileConfigRepository::new(data_dir));
        Self {
            service: ConfigService::new(repository),
        }
    }

    /// 使用自定义仓储创建
    pub fn with_repository(repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            service: ConfigService::new(repository),
        }
    }

    /// 配置变更时广播 `AppEvent::ConfigChanged`
    pub fn with_event_bus(self, event_bus: Arc<EventBus>) -> Self {
        Self {
            service: self.service.with_event_bus(event_bus),
        }
    }

    /// 获取配置服务
    pub fn service(&self) -> &ConfigService {
        &self.service
    }

    /// 获取全部配置
    pub async fn get_all(&self) -> Result<AppConfig, ConfigError> {
        self.service.get_all().await
    }

    /// 更新配置
    pub async fn update(&self, partial: PartialAppConfig) -> Result<AppConfig, ConfigError> {
        self.service.update(partial).await
    }

    /// 重置配置
    pub async fn reset(&self) -> Result<AppConfig, ConfigError> {
        self.service.reset().await
    }
}
