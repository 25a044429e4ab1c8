//! SOC Trainer - 事件响应演练模拟器
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误分类与恢复策略
//! - **llm**: 叙事服务客户端抽象与实现（OpenRouter / OpenAI 兼容 / Mock）
//! - **memory**: 角色消息与回合级叙事上下文
//! - **scenario**: 动作词表、场景目录、隐藏状态机与奖励
//! - **env**: 环境编排（reset / step）
//! - **encoder**: 叙事文本 → 离散状态键
//! - **rl**: 表格 Q-learning Agent 与训练循环
//! - **scoring**: 人类可读评分与准备度等级
//! - **report**: 时间线与报告渲染
//! - **session**: 无界面人工演练会话

pub mod config;
pub mod core;
pub mod encoder;
pub mod env;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod report;
pub mod rl;
pub mod scenario;
pub mod scoring;
pub mod session;

pub use encoder::{encode_state, KeywordEncoder, StateEncoder, StateKey};
pub use env::{IncidentEnv, StepOutcome};
pub use rl::{QLearningAgent, Trainer};
pub use scenario::Action;
