//! 叙事服务客户端抽象
//!
//! 所有后端（OpenAI 兼容 / OpenRouter / Mock）实现 LlmClient：输入完整的角色对话，返回一条 assistant 文本。
//! 调用无状态，上下文每次都需完整重发。RetryingLlmClient 为任意后端加上单次超时与有限重试。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::memory::Message;

/// 叙事服务错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Empty response from model")]
    EmptyResponse,
}

impl LlmError {
    /// 网络/限流/超时类错误可重试；空响应说明模型侧问题，不重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::ApiError(_) | LlmError::Timeout(_) | LlmError::RateLimited { .. }
        )
    }
}

/// 叙事服务客户端 trait
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// 获取累计 token 使用统计：(prompt_tokens, completion_tokens, total_tokens)
    /// 默认返回 (0, 0, 0)，具体实现可覆盖
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}

/// 重试策略：每次尝试的超时、最大重试次数、线性退避基数
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// 带超时与重试的包装客户端；超时到期视为可重试错误，重试耗尽后把最后一次错误交给调用方
pub struct RetryingLlmClient {
    inner: Arc<dyn LlmClient>,
    config: RetryConfig,
}

impl RetryingLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    async fn attempt(&self, messages: &[Message]) -> Result<String, LlmError> {
        match tokio::time::timeout(self.config.request_timeout, self.inner.complete(messages)).await
        {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.config.request_timeout.as_secs())),
        }
    }
}

#[async_trait]
impl LlmClient for RetryingLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let mut attempt = 0u32;
        loop {
            match self.attempt(messages).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = match &e {
                        LlmError::RateLimited { retry_after_ms } => {
                            Duration::from_millis(*retry_after_ms)
                        }
                        _ => self.config.base_delay * attempt,
                    };
                    tracing::warn!(
                        "Narrative request failed ({}), retry {}/{} in {:?}",
                        e,
                        attempt,
                        self.config.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn token_usage(&self) -> (u64, u64, u64) {
        self.inner.token_usage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 前 fail_times 次返回错误，之后成功
    struct FlakyClient {
        calls: AtomicUsize,
        fail_times: usize,
        error: LlmError,
    }

    #[async_trait]
    impl LlmClient for FlakyClient {
        async fn complete(&self, _messages: &[Message]) -> Result<String, LlmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_times {
                Err(self.error.clone())
            } else {
                Ok("recovered".to_string())
            }
        }
    }

    struct HangingClient;

    #[async_trait]
    impl LlmClient for HangingClient {
        async fn complete(&self, _messages: &[Message]) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("never".to_string())
        }
    }

    fn fast_retry(max_retries: u32) -> RetryConfig {
        RetryConfig {
            request_timeout: Duration::from_millis(50),
            max_retries,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let inner = Arc::new(FlakyClient {
            calls: AtomicUsize::new(0),
            fail_times: 2,
            error: LlmError::ApiError("502".to_string()),
        });
        let client = RetryingLlmClient::new(inner.clone(), fast_retry(2));
        let text = client.complete(&[Message::user("hi")]).await.unwrap();
        assert_eq!(text, "recovered");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let inner = Arc::new(FlakyClient {
            calls: AtomicUsize::new(0),
            fail_times: 10,
            error: LlmError::ApiError("401".to_string()),
        });
        let client = RetryingLlmClient::new(inner.clone(), fast_retry(1));
        let err = client.complete(&[Message::user("hi")]).await.unwrap_err();
        assert_eq!(err, LlmError::ApiError("401".to_string()));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_response_not_retried() {
        let inner = Arc::new(FlakyClient {
            calls: AtomicUsize::new(0),
            fail_times: 10,
            error: LlmError::EmptyResponse,
        });
        let client = RetryingLlmClient::new(inner.clone(), fast_retry(3));
        assert!(client.complete(&[Message::user("hi")]).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hanging_call_times_out() {
        let client = RetryingLlmClient::new(Arc::new(HangingClient), fast_retry(0));
        let err = client.complete(&[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout(_)));
    }
}
