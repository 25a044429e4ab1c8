//! 根据配置与环境变量构建叙事服务客户端（OpenRouter / OpenAI 兼容 / Mock）
//!
//! 真实后端一律包一层 RetryingLlmClient（单次超时 + 有限重试）。

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::core::SimError;
use crate::llm::{
    create_openrouter_client, LlmClient, MockLlmClient, OpenAiClient, RetryConfig,
    RetryingLlmClient,
};

/// 校验后的凭据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub api_key: String,
    pub model: String,
}

/// 校验 API Key 与模型名；`key_var` / `model_var` 仅用于错误信息
pub fn resolve_credentials(
    key_var: &str,
    api_key: Option<String>,
    model_var: &str,
    model: Option<String>,
) -> Result<ProviderCredentials, SimError> {
    let api_key = api_key.map(|k| k.trim().to_string()).unwrap_or_default();
    if api_key.is_empty() {
        return Err(SimError::Initialization(format!("{key_var} is missing")));
    }
    if !api_key.starts_with("sk-") {
        return Err(SimError::Initialization(format!(
            "{key_var} looks wrong (should start with sk-); remove quotes/spaces"
        )));
    }

    let model = model.map(|m| m.trim().to_string()).unwrap_or_default();
    if model.is_empty() {
        return Err(SimError::Initialization(format!(
            "{model_var} is missing (or set [llm].model)"
        )));
    }

    Ok(ProviderCredentials { api_key, model })
}

fn retry_config(cfg: &AppConfig) -> RetryConfig {
    RetryConfig {
        request_timeout: Duration::from_secs(cfg.llm.timeouts.request),
        max_retries: cfg.llm.retry.max_retries,
        base_delay: Duration::from_millis(cfg.llm.retry.base_delay_ms),
    }
}

/// 选择叙事后端；未知 provider 与凭据问题均为 Initialization 错误（不静默回退到 Mock）
pub fn create_llm_from_config(cfg: &AppConfig) -> Result<Arc<dyn LlmClient>, SimError> {
    let provider = cfg.llm.provider.trim().to_lowercase();
    let inner: Arc<dyn LlmClient> = match provider.as_str() {
        "openrouter" => {
            let client = create_openrouter_client(cfg.llm.model.as_deref(), cfg.llm.temperature)?;
            tracing::info!("Using OpenRouter narrator ({})", client.model());
            Arc::new(client)
        }
        "openai" => {
            let creds = resolve_credentials(
                "OPENAI_API_KEY",
                std::env::var("OPENAI_API_KEY").ok(),
                "OPENAI_MODEL",
                std::env::var("OPENAI_MODEL")
                    .ok()
                    .or_else(|| cfg.llm.model.clone()),
            )?;
            tracing::info!("Using OpenAI-compatible narrator ({})", creds.model);
            Arc::new(OpenAiClient::new(
                cfg.llm.base_url.as_deref(),
                &creds.model,
                &creds.api_key,
                cfg.llm.temperature,
            ))
        }
        "mock" => {
            tracing::info!("Using offline mock narrator");
            return Ok(Arc::new(MockLlmClient));
        }
        other => {
            return Err(SimError::Initialization(format!(
                "unknown llm provider '{other}' (expected openrouter, openai or mock)"
            )))
        }
    };

    Ok(Arc::new(RetryingLlmClient::new(inner, retry_config(cfg))))
}
