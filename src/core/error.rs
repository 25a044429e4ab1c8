//! 模拟器错误类型与恢复动作
//!
//! 与 RecoveryEngine 配合：根据 SimError 决定 AbortEpisode（丢弃当前回合继续训练）或 Abort（终止运行）。

use thiserror::Error;

use crate::llm::LlmError;

/// 场景引擎、环境、Agent 与叙事服务可能出现的错误
#[derive(Error, Debug)]
pub enum SimError {
    /// 调用顺序错误，如 reset 之前 step、终局后继续行动
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// 动作不在固定词表内等参数错误
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 凭据缺失/格式错误、模型未配置；启动阶段即致命
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// 叙事服务调用失败（网络、鉴权、超时）
    #[error("Narrative collaborator unavailable: {0}")]
    CollaboratorUnavailable(#[from] LlmError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 恢复引擎根据错误类型给出的建议动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// 丢弃当前回合（价值表未被更新），继续下一回合
    AbortEpisode,
    /// 终止整个运行
    Abort,
}
