use crate::error::{ConsistencyError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 网关鉴权凭证（App ID直接作为Bearer Token）
    pub app_id: Option<String>,
    pub api_endpoint: String,
    pub model: String,
    /// 成功后的请求间隔（秒）
    pub normal_delay_secs: u64,
    /// 失败后的冷却时长（秒），应长于正常间隔以避开限流
    pub error_cooldown_secs: u64,
    /// 单条最大重试次数（首次调用之外）
    pub max_retries: u32,
    pub timeout_seconds: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConsistencyError::Config("未找到用户主目录".into()))?;
        Ok(home.join(".config").join("consistency-ai").join("config.json"))
    }

    /// 取鉴权凭证：环境变量APP_ID优先，其次为配置文件
    pub fn get_app_id(&self) -> Result<String> {
        if let Ok(app_id) = std::env::var("APP_ID") {
            if !app_id.trim().is_empty() {
                return Ok(app_id);
            }
        }

        self.app_id.clone().ok_or(ConsistencyError::MissingAppId)
    }

    pub fn set_app_id(&mut self, app_id: String) -> Result<()> {
        self.app_id = Some(app_id);
        self.save()
    }

    pub fn set_model(&mut self, model: String) -> Result<()> {
        self.model = model;
        self.save()
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        self.api_endpoint = endpoint;
        self.save()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: None,
            api_endpoint: "https://aigc.sankuai.com/v1/openai/native/chat/completions".into(),
            model: "gemini-2.5-pro".into(),
            // 保守的限流参数：每分钟约6次请求，出错冷却60秒
            normal_delay_secs: 10,
            error_cooldown_secs: 60,
            max_retries: 3,
            timeout_seconds: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing_parameters() {
        let config = Config::default();
        assert_eq!(config.normal_delay_secs, 10);
        assert_eq!(config.error_cooldown_secs, 60);
        assert_eq!(config.max_retries, 3);
        // 冷却必须长于正常间隔
        assert!(config.error_cooldown_secs > config.normal_delay_secs);
    }

    #[test]
    fn test_missing_app_id_is_error() {
        let config = Config {
            app_id: None,
            ..Config::default()
        };
        // 环境变量未设置时应报MissingAppId
        if std::env::var("APP_ID").is_err() {
            assert!(matches!(
                config.get_app_id(),
                Err(ConsistencyError::MissingAppId)
            ));
        }
    }

    #[test]
    fn test_config_roundtrip_json() {
        let config = Config {
            app_id: Some("test-app".into()),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.app_id.as_deref(), Some("test-app"));
        assert_eq!(parsed.model, config.model);
    }
}
