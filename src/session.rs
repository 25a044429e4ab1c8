//! 无界面演练会话
//!
//! 供人类分析员（stdin / 其它前端）逐步操作同一个环境：记录事件日志与奖励日志，
//! 结束后计算评分并通过 ReportRenderer 生成报告。

use std::path::{Path, PathBuf};

use crate::core::SimError;
use crate::env::{IncidentEnv, StepOutcome};
use crate::report::{build_timeline, ReportInput, ReportRenderer, SessionEvent};
use crate::scenario::Action;
use crate::scoring::{compute_human_score, HumanScore};

pub struct DrillSession {
    env: IncidentEnv,
    events: Vec<SessionEvent>,
    rewards: Vec<f64>,
    actions: Vec<Action>,
    observation: Option<String>,
    done: bool,
}

impl DrillSession {
    pub fn new(env: IncidentEnv) -> Self {
        Self {
            env,
            events: Vec::new(),
            rewards: Vec::new(),
            actions: Vec::new(),
            observation: None,
            done: false,
        }
    }

    /// 开始 / 重置演练，返回开场观测
    pub async fn start(&mut self) -> Result<String, SimError> {
        let text = self.env.reset().await?;
        self.events = vec![SessionEvent::Scenario(text.clone())];
        self.rewards.clear();
        self.actions.clear();
        self.done = false;
        self.observation = Some(text.clone());
        Ok(text)
    }

    /// 执行一个动作标识
    pub async fn act(&mut self, action: &str) -> Result<StepOutcome, SimError> {
        if self.observation.is_none() {
            return Err(SimError::IllegalState("start an incident first".to_string()));
        }
        if self.done {
            return Err(SimError::IllegalState("incident already ended".to_string()));
        }
        let action = action.trim().parse::<Action>()?;
        let outcome = self.env.step(action).await?;

        self.events.push(SessionEvent::Action(action));
        self.events
            .push(SessionEvent::Observation(outcome.observation.clone()));
        self.actions.push(action);
        self.rewards.push(outcome.reward);
        self.done = outcome.done;
        self.observation = Some(outcome.observation.clone());
        Ok(outcome)
    }

    pub fn is_started(&self) -> bool {
        self.observation.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// 叙事服务失败后本次演练作废，需重新 start
    pub fn is_aborted(&self) -> bool {
        self.env.is_aborted()
    }

    pub fn steps(&self) -> usize {
        self.actions.len()
    }

    pub fn observation(&self) -> Option<&str> {
        self.observation.as_deref()
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn score(&self) -> HumanScore {
        compute_human_score(&self.actions, &self.rewards, self.steps(), self.done)
    }

    pub fn report_input(&self) -> ReportInput {
        let scenario_text = match self.events.first() {
            Some(SessionEvent::Scenario(text)) => text.clone(),
            _ => "N/A".to_string(),
        };
        ReportInput {
            scenario_text,
            timeline: build_timeline(&self.events),
            score: self.score(),
        }
    }

    pub fn render_report(&self, renderer: &dyn ReportRenderer) -> Result<Vec<u8>, SimError> {
        renderer.render(&self.report_input())
    }

    /// 渲染并写入 dir/incident_report_<时间戳>.<ext>
    pub fn write_report(
        &self,
        renderer: &dyn ReportRenderer,
        dir: &Path,
    ) -> Result<PathBuf, SimError> {
        let bytes = self.render_report(renderer)?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!(
            "incident_report_{}.{}",
            chrono::Local::now().format("%Y%m%d_%H%M%S"),
            renderer.extension()
        ));
        std::fs::write(&path, bytes)?;
        tracing::info!("Report written to {}", path.display());
        Ok(path)
    }
}
