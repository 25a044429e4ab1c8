//! 错误恢复引擎
//!
//! 根据 SimError 类型返回 RecoveryAction，供训练循环决定是丢弃当前回合还是终止运行。

use crate::core::{RecoveryAction, SimError};

/// 语义化错误恢复：叙事服务故障只影响单个回合，契约违规与初始化失败一律终止
#[derive(Debug, Default)]
pub struct RecoveryEngine;

impl RecoveryEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, err: &SimError) -> RecoveryAction {
        match err {
            SimError::CollaboratorUnavailable(e) => {
                tracing::warn!("Collaborator failure, aborting episode: {}", e);
                RecoveryAction::AbortEpisode
            }
            _ => RecoveryAction::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;

    #[test]
    fn test_recovery_collaborator_timeout() {
        let engine = RecoveryEngine::new();
        let err = SimError::CollaboratorUnavailable(LlmError::Timeout(60));
        assert_eq!(engine.handle(&err), RecoveryAction::AbortEpisode);
    }

    #[test]
    fn test_recovery_rate_limited() {
        let engine = RecoveryEngine::new();
        let err = SimError::from(LlmError::RateLimited { retry_after_ms: 1000 });
        assert_eq!(engine.handle(&err), RecoveryAction::AbortEpisode);
    }

    #[test]
    fn test_recovery_contract_violations_abort() {
        let engine = RecoveryEngine::new();
        let illegal = SimError::IllegalState("step before reset".to_string());
        let invalid = SimError::InvalidArgument("Unknown action: nuke".to_string());
        let init = SimError::Initialization("OPENROUTER_API_KEY is missing".to_string());
        assert_eq!(engine.handle(&illegal), RecoveryAction::Abort);
        assert_eq!(engine.handle(&invalid), RecoveryAction::Abort);
        assert_eq!(engine.handle(&init), RecoveryAction::Abort);
    }
}
