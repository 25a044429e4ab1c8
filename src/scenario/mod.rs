//! 场景引擎：动作词表、场景模板目录、单回合状态机（动作效果、奖励、终局判定）

pub mod action;
pub mod instance;
pub mod template;

pub use action::{available_actions, Action};
pub use instance::{
    compute_reward, IncidentPhase, ScenarioInstance, StepRecord, ATTACKER_SUCCESS_THRESHOLD,
    CLEAN_CLOSE_PROGRESS_LIMIT, PREMATURE_CLOSE_PROGRESS_PENALTY,
};
pub use template::{default_catalog, AttackVector, ScenarioTemplate, DEFAULT_STEP_BUDGET};
