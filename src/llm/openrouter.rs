//! OpenRouter 客户端（OpenAI 兼容格式）
//!
//! - Base URL: https://openrouter.ai/api/v1
//! - 凭据：`OPENROUTER_API_KEY`（必须以 `sk-` 开头），模型：`OPENROUTER_MODEL` 或配置 `[llm].model`

use crate::core::SimError;
use crate::llm::{resolve_credentials, OpenAiClient};

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// 创建 OpenRouter 客户端；凭据缺失或格式错误时返回 Initialization（启动即失败，避免训练中途才 401）
pub fn create_openrouter_client(
    model: Option<&str>,
    temperature: f32,
) -> Result<OpenAiClient, SimError> {
    let creds = resolve_credentials(
        "OPENROUTER_API_KEY",
        std::env::var("OPENROUTER_API_KEY").ok(),
        "OPENROUTER_MODEL",
        std::env::var("OPENROUTER_MODEL")
            .ok()
            .or_else(|| model.map(String::from)),
    )?;

    Ok(OpenAiClient::new(
        Some(OPENROUTER_BASE_URL),
        &creds.model,
        &creds.api_key,
        temperature,
    ))
}
