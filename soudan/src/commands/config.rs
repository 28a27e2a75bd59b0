use crate::modules::config::{AppConfig, PartialAppConfig};
use crate::modules::ConfigModule;
use crate::shared::AppResult;

/// 获取全部配置
pub async fn config_get_all(config_module: &ConfigModule) -> AppResult<AppConfig> {
    Ok(config_module.get_all().await?)
}

/// 更新配置，`partial` 为前端传来的 JSON
pub async fn config_update(
    config_module: &ConfigModule,
    partial: serde_json::Value,
) -> AppResult<AppConfig> {
    let partial: PartialAppConfig = serde_json::from_value(partial)?;
    Ok(config_module.update(partial).await?)
}

/// 重置配置
pub async fn config_reset(config_module: &ConfigModule) -> AppResult<AppConfig> {
    Ok(config_module.reset().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::AppError;

    #[tokio::test]
    async fn test_config_update_from_json() {
        let module = ConfigModule::new_in_memory();
        let config = config_update(
            &module,
            serde_json::json!({ "consultation": { "defaultLanguage": "zh" } }),
        )
        .await
        .unwrap();
        assert_eq!(config.consultation.default_language, "zh");

        let invalid = config_update(
            &module,
            serde_json::json!({ "consultation": { "maxRecordingSecs": 0 } }),
        )
        .await;
        assert!(matches!(invalid, Err(AppError::ConfigError(_))));

        let malformed =
            config_update(&module, serde_json::json!({ "consultation": "yes" })).await;
        assert!(matches!(malformed, Err(AppError::SerializationError(_))));

        let reset = config_reset(&module).await.unwrap();
        assert_eq!(reset, config_get_all(&module).await.unwrap());
    }
}
