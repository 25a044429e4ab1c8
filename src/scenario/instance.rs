//! 单回合场景状态机
//!
//! 隐藏状态：步数、contained / resolved（单向 false→true）、攻击进度（单调不减）、只追加的步骤记录。
//! apply 每次推进一步；终局（攻击成功 / 已解决 / 步数耗尽）后拒绝继续推进。

use serde::Serialize;

use crate::core::SimError;
use crate::scenario::{Action, ScenarioTemplate};

/// 攻击进度达到此值且未遏制即攻击成功
pub const ATTACKER_SUCCESS_THRESHOLD: u32 = 7;
/// 进度低于此值且已遏制时关闭事件才算干净关闭
pub const CLEAN_CLOSE_PROGRESS_LIMIT: u32 = 5;
/// 过早关闭额外增加的攻击进度
pub const PREMATURE_CLOSE_PROGRESS_PENALTY: u32 = 2;

const STEP_COST: f64 = 0.5;
const CONTAINMENT_BONUS: f64 = 5.0;
const RESOLUTION_BONUS: f64 = 15.0;
const PREMATURE_CLOSE_PENALTY: f64 = 5.0;
const ATTACKER_SUCCESS_PENALTY: f64 = 20.0;

/// 一步之后的快照；追加进历史后不再修改，同时作为环境的隐藏摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub step: u32,
    pub action: Action,
    pub attacker_progress: u32,
    pub contained: bool,
    pub resolved: bool,
    pub attacker_success: bool,
    pub notes: Vec<String>,
}

/// 状态机视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncidentPhase {
    Active,
    Contained,
    Resolved,
    AttackerWon,
    TimedOut,
}

impl IncidentPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            IncidentPhase::Resolved | IncidentPhase::AttackerWon | IncidentPhase::TimedOut
        )
    }
}

/// 奖励：每步成本 + 遏制奖励 + 干净解决奖励 - 过早关闭惩罚 - 攻击成功惩罚，各项独立叠加
pub fn compute_reward(summary: &StepRecord) -> f64 {
    let mut reward = -STEP_COST;
    if summary.contained {
        reward += CONTAINMENT_BONUS;
    }
    if summary.resolved && summary.attacker_progress < ATTACKER_SUCCESS_THRESHOLD {
        reward += RESOLUTION_BONUS;
    }
    if summary.action == Action::CloseIncident && !summary.resolved {
        reward -= PREMATURE_CLOSE_PENALTY;
    }
    if summary.attacker_success {
        reward -= ATTACKER_SUCCESS_PENALTY;
    }
    reward
}

#[derive(Debug, Clone)]
pub struct ScenarioInstance {
    template: ScenarioTemplate,
    step_count: u32,
    contained: bool,
    resolved: bool,
    attacker_progress: u32,
    history: Vec<StepRecord>,
}

impl ScenarioTemplate {
    /// 只复制模板字段；可变计数全部从初始值开始
    pub fn instantiate(&self) -> ScenarioInstance {
        ScenarioInstance {
            template: self.clone(),
            step_count: 0,
            contained: false,
            resolved: false,
            attacker_progress: 0,
            history: Vec::new(),
        }
    }
}

impl ScenarioInstance {
    pub fn template(&self) -> &ScenarioTemplate {
        &self.template
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn contained(&self) -> bool {
        self.contained
    }

    pub fn resolved(&self) -> bool {
        self.resolved
    }

    pub fn attacker_progress(&self) -> u32 {
        self.attacker_progress
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    /// 推进一步并返回该步快照
    pub fn apply(&mut self, action: Action) -> Result<StepRecord, SimError> {
        if self.phase().is_terminal() {
            return Err(SimError::IllegalState(format!(
                "scenario '{}' already terminated ({:?})",
                self.template.name,
                self.phase()
            )));
        }

        self.step_count += 1;
        let mut notes = Vec::new();

        // 未遏制期间攻击者先行一步
        if !self.contained && !self.resolved {
            self.attacker_progress += 1;
        }

        let vector = self.template.vector;
        match action {
            Action::InspectAlert => {
                notes.push("Analyst reviewed SIEM alert metadata and timestamps.".to_string());
            }
            Action::InspectEndpointLogs | Action::InspectAuthLogs => {
                notes.push(
                    if action == Action::InspectEndpointLogs {
                        "Endpoint logs were reviewed for suspicious processes and file activity."
                    } else {
                        "Authentication logs were reviewed for anomalous logins."
                    }
                    .to_string(),
                );
                if vector.corroborating_action() == Some(action) {
                    if let Some(evidence) = &self.template.corroborating_evidence {
                        notes.push(evidence.clone());
                    }
                }
            }
            Action::IsolateHost | Action::BlockNetworkIndicator | Action::ResetCredentials => {
                if action == Action::BlockNetworkIndicator {
                    notes.push("Firewall rule added to block suspicious IP / domain.".to_string());
                }
                if vector.containment_action() == action {
                    self.contained = true;
                    notes.push(self.template.containment_note.clone());
                } else if action == Action::IsolateHost {
                    notes.push(
                        "Host isolated. Impact depends on whether the incident is endpoint-driven."
                            .to_string(),
                    );
                } else if action == Action::ResetCredentials {
                    notes.push(
                        "Password reset performed, but incident may not be identity-related."
                            .to_string(),
                    );
                }
            }
            Action::Escalate => {
                notes.push(
                    "Escalated to Tier 2 / IR team with collected evidence and timeline."
                        .to_string(),
                );
            }
            Action::CloseIncident => {
                if self.contained && self.attacker_progress < CLEAN_CLOSE_PROGRESS_LIMIT {
                    self.resolved = true;
                    notes.push(
                        "Incident closed after containment and basic remediation steps."
                            .to_string(),
                    );
                } else {
                    notes.push(
                        "Incident closed without clear containment. Residual risk remains."
                            .to_string(),
                    );
                    self.attacker_progress += PREMATURE_CLOSE_PROGRESS_PENALTY;
                }
            }
        }

        let attacker_success =
            self.attacker_progress >= ATTACKER_SUCCESS_THRESHOLD && !self.contained;

        let record = StepRecord {
            step: self.step_count,
            action,
            attacker_progress: self.attacker_progress,
            contained: self.contained,
            resolved: self.resolved,
            attacker_success,
            notes,
        };
        self.history.push(record.clone());
        Ok(record)
    }

    pub fn compute_reward(&self, summary: &StepRecord) -> f64 {
        compute_reward(summary)
    }

    pub fn is_done(&self, summary: &StepRecord) -> bool {
        summary.attacker_success || self.resolved || self.step_count >= self.template.step_budget
    }

    pub fn phase(&self) -> IncidentPhase {
        if self.resolved {
            IncidentPhase::Resolved
        } else if self.history.last().is_some_and(|r| r.attacker_success) {
            IncidentPhase::AttackerWon
        } else if self.step_count >= self.template.step_budget {
            IncidentPhase::TimedOut
        } else if self.contained {
            IncidentPhase::Contained
        } else {
            IncidentPhase::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{default_catalog, AttackVector};

    fn scenario(vector: AttackVector) -> ScenarioInstance {
        default_catalog()
            .into_iter()
            .find(|t| t.vector == vector)
            .unwrap()
            .instantiate()
    }

    #[test]
    fn test_isolate_then_close_ransomware() {
        let mut s = scenario(AttackVector::Endpoint);

        let first = s.apply(Action::IsolateHost).unwrap();
        assert!(first.contained);
        assert_eq!(first.attacker_progress, 1);
        assert_eq!(s.compute_reward(&first), 4.5);
        assert!(!s.is_done(&first));
        assert_eq!(s.phase(), IncidentPhase::Contained);

        let second = s.apply(Action::CloseIncident).unwrap();
        assert!(second.resolved);
        assert_eq!(second.attacker_progress, 1);
        assert_eq!(s.compute_reward(&second), 19.5);
        assert!(s.is_done(&second));
        assert_eq!(s.phase(), IncidentPhase::Resolved);
    }

    #[test]
    fn test_apply_after_termination_rejected() {
        let mut s = scenario(AttackVector::Endpoint);
        s.apply(Action::IsolateHost).unwrap();
        s.apply(Action::CloseIncident).unwrap();
        let err = s.apply(Action::Escalate).unwrap_err();
        assert!(matches!(err, SimError::IllegalState(_)));
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_wrong_containment_is_ambiguous() {
        let mut s = scenario(AttackVector::Network);
        let r = s.apply(Action::IsolateHost).unwrap();
        assert!(!r.contained);
        assert!(r.notes[0].contains("Impact depends"));

        let r = s.apply(Action::ResetCredentials).unwrap();
        assert!(!r.contained);

        let r = s.apply(Action::BlockNetworkIndicator).unwrap();
        assert!(r.contained);
        assert_eq!(r.notes.len(), 2);
        assert_eq!(r.attacker_progress, 3);
    }

    #[test]
    fn test_corroborating_evidence_only_on_matching_vector() {
        let mut ransomware = scenario(AttackVector::Endpoint);
        let r = ransomware.apply(Action::InspectEndpointLogs).unwrap();
        assert!(r.notes.iter().any(|n| n.contains("encryption")));
        let r = ransomware.apply(Action::InspectAuthLogs).unwrap();
        assert_eq!(r.notes.len(), 1);

        let mut account = scenario(AttackVector::Account);
        let r = account.apply(Action::InspectAuthLogs).unwrap();
        assert!(r.notes.iter().any(|n| n.contains("failed logins")));
        assert!(!r.contained);
    }

    #[test]
    fn test_premature_close_penalty() {
        let mut s = scenario(AttackVector::Account);
        let r = s.apply(Action::CloseIncident).unwrap();
        // +1 攻击者推进，+2 过早关闭
        assert_eq!(r.attacker_progress, 3);
        assert!(!r.resolved);
        assert_eq!(s.compute_reward(&r), -5.5);
        assert!(!s.is_done(&r));
    }

    #[test]
    fn test_late_close_after_containment_not_resolved() {
        let mut s = scenario(AttackVector::Account);
        for _ in 0..4 {
            s.apply(Action::InspectAlert).unwrap();
        }
        let r = s.apply(Action::ResetCredentials).unwrap();
        assert_eq!(r.attacker_progress, 5);
        assert!(r.contained);

        // 已遏制但进度 >= 5：不算干净关闭，进度 +2 且不再自然推进
        let r = s.apply(Action::CloseIncident).unwrap();
        assert!(!r.resolved);
        assert_eq!(r.attacker_progress, 7);
        assert!(!r.attacker_success);
        assert_eq!(s.compute_reward(&r), -0.5 + 5.0 - 5.0);
    }

    #[test]
    fn test_attacker_wins_when_never_contained() {
        let mut s = scenario(AttackVector::Network);
        let mut last = None;
        for _ in 0..7 {
            last = Some(s.apply(Action::Escalate).unwrap());
        }
        let r = last.unwrap();
        assert_eq!(r.attacker_progress, 7);
        assert!(r.attacker_success);
        assert!(s.is_done(&r));
        assert_eq!(s.compute_reward(&r), -20.5);
        assert_eq!(s.phase(), IncidentPhase::AttackerWon);
    }

    #[test]
    fn test_timeout_after_budget() {
        let mut s = scenario(AttackVector::Endpoint);
        s.apply(Action::IsolateHost).unwrap();
        let mut last = None;
        for _ in 1..crate::scenario::DEFAULT_STEP_BUDGET {
            last = Some(s.apply(Action::InspectAlert).unwrap());
        }
        let r = last.unwrap();
        assert!(s.is_done(&r));
        assert!(!r.attacker_success);
        assert_eq!(s.phase(), IncidentPhase::TimedOut);
        assert!(s.compute_reward(&r) > 0.0);
    }

    #[test]
    fn test_invariants_over_action_sequences() {
        // 简单 LCG 生成确定性的动作序列
        let mut seed: u64 = 0x5eed;
        for template in default_catalog() {
            for _ in 0..50 {
                let mut s = template.instantiate();
                let mut prev_progress = 0;
                let mut was_contained = false;
                while !s.phase().is_terminal() {
                    seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    let action = Action::ALL[(seed >> 33) as usize % Action::COUNT];
                    let contained_before = s.contained();
                    let progress_before = s.attacker_progress();
                    let r = s.apply(action).unwrap();

                    assert!(r.attacker_progress >= prev_progress);
                    assert!(r.attacker_progress - progress_before <= 3);
                    if was_contained {
                        assert!(r.contained);
                    }
                    if r.resolved {
                        assert!(contained_before);
                        assert!(progress_before < CLEAN_CLOSE_PROGRESS_LIMIT);
                    }
                    assert_eq!(s.history().len() as u32, s.step_count());
                    prev_progress = r.attacker_progress;
                    was_contained = r.contained;
                }
            }
        }
    }

    #[test]
    fn test_reward_formula_representative() {
        let base = StepRecord {
            step: 1,
            action: Action::InspectAlert,
            attacker_progress: 2,
            contained: false,
            resolved: false,
            attacker_success: false,
            notes: vec![],
        };
        assert_eq!(compute_reward(&base), -0.5);

        let contained = StepRecord { contained: true, ..base.clone() };
        assert_eq!(compute_reward(&contained), 4.5);

        let resolved_late = StepRecord {
            action: Action::CloseIncident,
            contained: true,
            resolved: true,
            attacker_progress: 7,
            ..base.clone()
        };
        assert_eq!(compute_reward(&resolved_late), 4.5);

        let lost = StepRecord {
            action: Action::CloseIncident,
            attacker_progress: 9,
            attacker_success: true,
            ..base
        };
        assert_eq!(compute_reward(&lost), -0.5 - 5.0 - 20.0);
    }
}
