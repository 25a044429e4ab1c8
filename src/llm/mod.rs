//! LLM 层：叙事服务客户端抽象与实现（OpenAI 兼容 / OpenRouter / Mock）

pub mod factory;
pub mod mock;
pub mod openai;
pub mod openrouter;
pub mod traits;

pub use factory::{create_llm_from_config, resolve_credentials, ProviderCredentials};
pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, TokenUsage};
pub use openrouter::{create_openrouter_client, OPENROUTER_BASE_URL};
pub use traits::{LlmClient, LlmError, RetryConfig, RetryingLlmClient};
