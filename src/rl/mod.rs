//! 学习层：表格 Q-learning Agent 与训练循环

pub mod agent;
pub mod trainer;

pub use agent::{AgentParams, QLearningAgent};
pub use trainer::{EpisodeReport, Trainer, TrainingSummary};
