//! 训练循环
//!
//! 每回合：reset → 编码开场观测 → 循环（选动作 → step → 编码下一观测 → 更新 Q 表）直到终局或步数上限。
//! 训练结束后 epsilon 置 0，再跑一个贪心评估回合。
//! 叙事服务故障时中止当前回合：Q 表只在拿到奖励与下一状态后才更新，因此不会被污染。

use serde::Serialize;

use crate::config::TrainingSection;
use crate::core::{RecoveryAction, RecoveryEngine, SimError};
use crate::encoder::{KeywordEncoder, StateEncoder};
use crate::env::IncidentEnv;
use crate::rl::QLearningAgent;
use crate::scenario::Action;

/// 单回合报告
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeReport {
    pub episode: usize,
    pub scenario: String,
    pub actions: Vec<Action>,
    pub rewards: Vec<f64>,
    pub steps: usize,
    pub done: bool,
    pub total_reward: f64,
    /// 终局且累计奖励为正
    pub success: bool,
}

/// 整次训练的摘要
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    pub episodes: Vec<EpisodeReport>,
    pub aborted_episodes: usize,
    pub evaluation: EpisodeReport,
    pub states_learned: usize,
    /// 叙事服务累计 token（Mock 为 0）
    pub total_tokens: u64,
}

impl TrainingSummary {
    pub fn success_rate(&self) -> f64 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        let wins = self.episodes.iter().filter(|e| e.success).count();
        wins as f64 / self.episodes.len() as f64
    }
}

pub struct Trainer<E: StateEncoder = KeywordEncoder> {
    env: IncidentEnv,
    agent: QLearningAgent,
    encoder: E,
    config: TrainingSection,
    recovery: RecoveryEngine,
}

impl Trainer<KeywordEncoder> {
    pub fn new(env: IncidentEnv, agent: QLearningAgent, config: TrainingSection) -> Self {
        Self::with_encoder(env, agent, KeywordEncoder, config)
    }
}

impl<E: StateEncoder> Trainer<E> {
    pub fn with_encoder(
        env: IncidentEnv,
        agent: QLearningAgent,
        encoder: E,
        config: TrainingSection,
    ) -> Self {
        Self {
            env,
            agent,
            encoder,
            config,
            recovery: RecoveryEngine::new(),
        }
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    pub fn env(&self) -> &IncidentEnv {
        &self.env
    }

    /// 跑一个回合，每步都更新 Q 表
    pub async fn run_episode(&mut self, episode: usize) -> Result<EpisodeReport, SimError> {
        let opening = self.env.reset().await?;
        let mut state = self.encoder.encode(&opening);
        let scenario = self
            .env
            .current()
            .map(|s| s.name().to_string())
            .unwrap_or_default();

        let mut actions = Vec::new();
        let mut rewards = Vec::new();
        let mut done = false;

        for _ in 0..self.config.max_steps_per_episode {
            let action = self.agent.select_action(state);
            let outcome = self.env.step(action).await?;
            let next_state = self.encoder.encode(&outcome.observation);

            self.agent.update(state, action, outcome.reward, next_state);
            actions.push(action);
            rewards.push(outcome.reward);
            state = next_state;
            done = outcome.done;

            if done {
                break;
            }
        }

        let total_reward: f64 = rewards.iter().sum();
        Ok(EpisodeReport {
            episode,
            scenario,
            steps: actions.len(),
            actions,
            rewards,
            done,
            total_reward,
            success: done && total_reward > 0.0,
        })
    }

    /// 完整训练 + 贪心评估
    pub async fn train(&mut self) -> Result<TrainingSummary, SimError> {
        let mut episodes = Vec::with_capacity(self.config.episodes);
        let mut aborted = 0;
        let mut consecutive_failures = 0;

        for ep in 1..=self.config.episodes {
            match self.run_episode(ep).await {
                Ok(report) => {
                    consecutive_failures = 0;
                    if self.config.report_every > 0 && ep % self.config.report_every == 0 {
                        tracing::info!(
                            "Episode {}: total_reward={:.2}, status={}",
                            ep,
                            report.total_reward,
                            if report.success { "success" } else { "fail" }
                        );
                    }
                    episodes.push(report);
                }
                Err(e) => match self.recovery.handle(&e) {
                    RecoveryAction::AbortEpisode => {
                        aborted += 1;
                        consecutive_failures += 1;
                        tracing::warn!("Episode {} aborted: {}", ep, e);
                        if consecutive_failures >= self.config.max_consecutive_failures {
                            tracing::error!(
                                "{} consecutive episodes aborted, giving up",
                                consecutive_failures
                            );
                            return Err(e);
                        }
                    }
                    RecoveryAction::Abort => return Err(e),
                },
            }
        }

        self.agent.set_epsilon(0.0);
        let evaluation = self.run_episode(self.config.episodes + 1).await?;
        tracing::info!(
            "Greedy evaluation on {}: total_reward={:.2}, success={}",
            evaluation.scenario,
            evaluation.total_reward,
            evaluation.success
        );

        let (prompt, completion, total) = self.env.token_usage();
        tracing::info!(
            "Narrator token usage: prompt={}, completion={}, total={}",
            prompt,
            completion,
            total
        );

        Ok(TrainingSummary {
            episodes,
            aborted_episodes: aborted,
            evaluation,
            states_learned: self.agent.state_count(),
            total_tokens: total,
        })
    }
}
