//! 人类可读评分：把一次演练的动作/奖励日志折算为 0-100 分、准备度等级与反馈
//!
//! 纯函数，不依赖环境；会话结束后调用一次。

use std::fmt;

use serde::Serialize;

use crate::scenario::Action;

const BASE_SCORE: i64 = 50;

/// 准备度等级（由高到低）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadinessTier {
    Tier3Ready,
    Tier2Ready,
    Tier1Ready,
    JuniorSoc,
    NeedsTraining,
}

impl ReadinessTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            95..=u8::MAX => ReadinessTier::Tier3Ready,
            85..=94 => ReadinessTier::Tier2Ready,
            70..=84 => ReadinessTier::Tier1Ready,
            50..=69 => ReadinessTier::JuniorSoc,
            _ => ReadinessTier::NeedsTraining,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadinessTier::Tier3Ready => "Tier-3 Ready",
            ReadinessTier::Tier2Ready => "Tier-2 Ready",
            ReadinessTier::Tier1Ready => "Tier-1 Ready",
            ReadinessTier::JuniorSoc => "Junior SOC",
            ReadinessTier::NeedsTraining => "Needs Training",
        }
    }
}

impl fmt::Display for ReadinessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HumanScore {
    pub score: u8,
    pub tier: ReadinessTier,
    pub feedback: Vec<String>,
}

/// 速度（步数）+ 决策质量（正/负奖励步数）+ 结果（是否终局），最后截断到 [0, 100]
pub fn compute_human_score(
    _actions: &[Action],
    rewards: &[f64],
    total_steps: usize,
    done: bool,
) -> HumanScore {
    let mut score = BASE_SCORE;

    score += match total_steps {
        0..=5 => 20,
        6..=8 => 10,
        _ => -5,
    };

    let good = rewards.iter().filter(|r| **r > 0.0).count() as i64;
    let bad = rewards.iter().filter(|r| **r < 0.0).count() as i64;
    score += good * 3;
    score -= bad * 4;

    score += if done { 20 } else { -20 };

    let score = score.clamp(0, 100) as u8;

    let mut feedback = Vec::new();
    if bad > good {
        feedback.push("Too many risky actions taken.".to_string());
    }
    if total_steps > 8 {
        feedback.push("Slow containment.".to_string());
    }
    if !done {
        feedback.push("Incident not fully resolved.".to_string());
    }

    HumanScore {
        score,
        tier: ReadinessTier::from_score(score),
        feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_clean_resolution() {
        let actions = [Action::IsolateHost, Action::CloseIncident];
        let result = compute_human_score(&actions, &[4.5, 19.5], 2, true);
        // 50 + 20 + 6 + 20
        assert_eq!(result.score, 96);
        assert_eq!(result.tier, ReadinessTier::Tier3Ready);
        assert!(result.feedback.is_empty());
    }

    #[test]
    fn test_empty_logs_zero_steps() {
        let done = compute_human_score(&[], &[], 0, true);
        assert_eq!(done.score, 90);
        assert_eq!(done.tier, ReadinessTier::Tier2Ready);

        let not_done = compute_human_score(&[], &[], 0, false);
        assert_eq!(not_done.score, 50);
        assert_eq!(not_done.tier, ReadinessTier::JuniorSoc);
        assert_eq!(not_done.feedback, vec!["Incident not fully resolved."]);
    }

    #[test]
    fn test_clamped_low() {
        let rewards = vec![-0.5; 40];
        let result = compute_human_score(&[], &rewards, 40, false);
        assert_eq!(result.score, 0);
        assert_eq!(result.tier, ReadinessTier::NeedsTraining);
        assert_eq!(
            result.feedback,
            vec![
                "Too many risky actions taken.",
                "Slow containment.",
                "Incident not fully resolved."
            ]
        );
    }

    #[test]
    fn test_clamped_high() {
        let rewards = vec![4.5; 5];
        let result = compute_human_score(&[], &rewards, 5, true);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_score_always_in_range() {
        for steps in [0usize, 1, 5, 6, 8, 9, 50] {
            for good in 0..12 {
                for bad in 0..12 {
                    let mut rewards = vec![1.0; good];
                    rewards.extend(vec![-1.0; bad]);
                    rewards.push(0.0);
                    for done in [true, false] {
                        let r = compute_human_score(&[], &rewards, steps, done);
                        assert!(r.score <= 100);
                        assert_eq!(r.tier, ReadinessTier::from_score(r.score));
                    }
                }
            }
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ReadinessTier::from_score(95), ReadinessTier::Tier3Ready);
        assert_eq!(ReadinessTier::from_score(94), ReadinessTier::Tier2Ready);
        assert_eq!(ReadinessTier::from_score(85), ReadinessTier::Tier2Ready);
        assert_eq!(ReadinessTier::from_score(84), ReadinessTier::Tier1Ready);
        assert_eq!(ReadinessTier::from_score(70), ReadinessTier::Tier1Ready);
        assert_eq!(ReadinessTier::from_score(69), ReadinessTier::JuniorSoc);
        assert_eq!(ReadinessTier::from_score(50), ReadinessTier::JuniorSoc);
        assert_eq!(ReadinessTier::from_score(49), ReadinessTier::NeedsTraining);
    }
}
