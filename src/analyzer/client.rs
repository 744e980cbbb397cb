//! AI网关客户端
//!
//! 通过OpenAI兼容的chat/completions接口发起一致性判定。
//! 网络错误、非2xx响应、响应体不含合法判定JSON均按本次尝试失败返回，
//! 可否重试由引擎决定。调用方通过超时兜底，不依赖远端自行返回。

use super::parser;
use super::types::{ItemPayload, Verdict};
use crate::config::Config;
use crate::error::{ConsistencyError, Result};
use crate::prompts;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// 一致性判定客户端接口
///
/// 远端调用计费且限流，实现方不保证幂等；
/// 调用次数由引擎的重试策略控制。
#[async_trait]
pub trait ConsistencyClient: Send + Sync {
    async fn classify(&self, payload: &ItemPayload) -> Result<Verdict>;
}

/// 公司内网AI网关实现
pub struct GatewayClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    app_id: String,
    verbose: bool,
}

impl GatewayClient {
    /// 凭证缺失在构造时一次性报错，不会到逐条调用时才暴露
    pub fn new(config: &Config) -> Result<Self> {
        let app_id = config.get_app_id()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ConsistencyError::ApiCall(format!("HTTP客户端初始化失败: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.api_endpoint.clone(),
            model: config.model.clone(),
            app_id,
            verbose: false,
        })
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn build_request_body(&self, system_prompt: &str, user_prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "stream": false,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ],
            "temperature": 0.1
        })
    }
}

#[async_trait]
impl ConsistencyClient for GatewayClient {
    async fn classify(&self, payload: &ItemPayload) -> Result<Verdict> {
        let (system_prompt, user_prompt) = prompts::build_prompts(payload);
        let body = self.build_request_body(system_prompt, &user_prompt);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.app_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| ConsistencyError::ApiCall(format!("网络请求失败: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ConsistencyError::ApiCall(format!(
                "网关返回 {}: {}",
                status,
                text.trim()
            )));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ConsistencyError::ApiParse(format!("响应体不是合法JSON: {}", e)))?;

        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ConsistencyError::ApiParse("响应缺少 choices[0].message.content".into())
            })?;

        if self.verbose {
            let preview: String = content.chars().take(500).collect();
            println!("  模型响应: {}", preview);
        }

        parser::parse_verdict(payload.mode(), content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_body_shape() {
        let config = Config {
            app_id: Some("test".into()),
            ..Config::default()
        };
        let client = GatewayClient::new(&config).unwrap();
        let body = client.build_request_body("system", "user");

        assert_eq!(body["model"], config.model);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["temperature"], 0.1);
    }
}
