//! 表格 Q-learning Agent
//!
//! 价值表：StateKey → 每个动作一个估计值（按词表顺序存储）。首次见到某状态时全部初始化为 0.0。
//! 价值表跨回合保留（这就是学习本身），由 Agent 实例显式持有，运行结束即丢弃。

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::AgentSection;
use crate::encoder::StateKey;
use crate::scenario::Action;

type ActionValues = [f64; Action::COUNT];

/// 超参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentParams {
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            alpha: 0.15,
            gamma: 0.95,
            epsilon: 0.3,
        }
    }
}

impl From<&AgentSection> for AgentParams {
    fn from(section: &AgentSection) -> Self {
        Self {
            alpha: section.alpha,
            gamma: section.gamma,
            epsilon: section.epsilon,
        }
    }
}

pub struct QLearningAgent {
    params: AgentParams,
    q: HashMap<StateKey, ActionValues>,
    rng: StdRng,
}

impl QLearningAgent {
    pub fn new(params: AgentParams) -> Self {
        Self {
            params,
            q: HashMap::new(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn params(&self) -> AgentParams {
        self.params
    }

    pub fn epsilon(&self) -> f64 {
        self.params.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.params.epsilon = epsilon;
    }

    /// 已见过的状态数
    pub fn state_count(&self) -> usize {
        self.q.len()
    }

    pub fn values(&self, state: &StateKey) -> Option<&ActionValues> {
        self.q.get(state)
    }

    pub fn value(&self, state: &StateKey, action: Action) -> f64 {
        self.q.get(state).map_or(0.0, |v| v[action.index()])
    }

    fn values_mut(&mut self, state: StateKey) -> &mut ActionValues {
        self.q.entry(state).or_insert([0.0; Action::COUNT])
    }

    /// epsilon-greedy；epsilon 为 0 时不消耗随机数
    pub fn select_action(&mut self, state: StateKey) -> Action {
        let epsilon = self.params.epsilon;
        if epsilon > 0.0 && self.rng.gen::<f64>() < epsilon {
            // ALL 非空
            if let Some(action) = Action::ALL.choose(&mut self.rng) {
                return *action;
            }
        }
        self.greedy_action(state)
    }

    /// 取当前最大值动作；平局按词表顺序取第一个
    pub fn greedy_action(&mut self, state: StateKey) -> Action {
        let values = *self.values_mut(state);
        let mut best = 0;
        for (i, v) in values.iter().enumerate().skip(1) {
            if *v > values[best] {
                best = i;
            }
        }
        Action::ALL[best]
    }

    /// TD 更新：Q(s,a) += alpha * (r + gamma * max Q(s',·) - Q(s,a))
    pub fn update(&mut self, state: StateKey, action: Action, reward: f64, next_state: StateKey) {
        let best_next = self
            .values_mut(next_state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let AgentParams { alpha, gamma, .. } = self.params;
        let slot = &mut self.values_mut(state)[action.index()];
        *slot += alpha * (reward + gamma * best_next - *slot);
    }
}
