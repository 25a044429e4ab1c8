//! 环境层：编排场景状态机与叙事服务，对外暴露 reset / step

pub mod environment;

pub use environment::{IncidentEnv, StepOutcome, SYSTEM_PROMPT};
