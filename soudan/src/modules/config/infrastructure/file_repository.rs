// JSON File Config Repository
//
// 基于单个 JSON 文件的配置仓储实现

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::modules::config::domain::AppConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

const CONFIG_FILE_NAME: &str = "consultation.json";

/// JSON 文件配置仓储
///
/// 文件不存在时返回默认配置；写入先落临时文件再改名，避免半写文件
pub struct JsonFileConfigRepository {
    /// 配置文件路径
    config_path: PathBuf,
    /// 内存缓存
    cache: Arc<RwLock<Option<AppConfig>>>,
}

impl JsonFileConfigRepository {
    /// 在数据目录下使用默认文件名
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::with_path(data_dir.as_ref().join(CONFIG_FILE_NAME))
    }

    /// 使用指定的文件路径
    pub fn with_path(config_path: PathBuf) -> Self {
        Self {
            config_path,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// 从文件加载配置
    async fn load_from_file(&self) -> Result<Option<AppConfig>, ConfigError> {
        if !tokio::fs::try_exists(&self.config_path).await? {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.config_path).await?;
        let config: AppConfig = serde_json::from_str(&content)?;

        Ok(Some(config))
    }

    /// 保存配置到文件
    async fn save_to_file(&self, config: &AppConfig) -> Result<(), ConfigError> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(config)?;
        let tmp_path = self.config_path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.config_path).await?;

        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for JsonFileConfigRepository {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        // 先检查缓存
        {
            let cache = self.cache.read().await;
            if let Some(ref config) = *cache {
                return Ok(config.clone());
            }
        }

        let config = self.load_from_file().await?.unwrap_or_default();

        {
            let mut cache = self.cache.write().await;
            *cache = Some(config.clone());
        }

        Ok(config)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.save_to_file(config).await?;

        {
            let mut cache = self.cache.write().await;
            *cache = Some(config.clone());
        }

        tracing::debug!("[ConfigRepository] Saved config to {:?}", self.config_path);
        Ok(())
    }

    async fn clear(&self) -> Result<(), ConfigError> {
        if tokio::fs::try_exists(&self.config_path).await? {
            tokio::fs::remove_file(&self.config_path).await?;
        }

        {
            let mut cache = self.cache.write().await;
            *cache = None;
        }

        Ok(())
    }

    async fn exists(&self) -> Result<bool, ConfigError> {
        Ok(tokio::fs::try_exists(&self.config_path).await?)
    }
}
