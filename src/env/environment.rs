//! 事件响应环境
//!
//! reset：从目录中均匀抽取场景模板，实例化新状态，重建叙事上下文并取得开场观测；
//! step：状态机推进一步、计算奖励与终局，把完整隐藏摘要交给叙事服务，只返回分析员可见的文字。
//! 叙事上下文在回合内只增不减，reset 时整体丢弃。所有调用严格串行。
//! 叙事服务调用失败即中止当前回合：之后的 step 一律 IllegalState，直到下一次 reset。

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::core::SimError;
use crate::llm::LlmClient;
use crate::memory::{ConversationMemory, Message};
use crate::scenario::{default_catalog, Action, ScenarioInstance, ScenarioTemplate, StepRecord};

/// 叙事服务的固定系统指令：约束语气、禁止泄露隐藏字段、限制篇幅
pub const SYSTEM_PROMPT: &str = "You are a SOC incident simulator. You receive hidden incident state and an analyst action. \
Respond with what the analyst would observe: alerts, logs, user reports, and next hints. \
Keep responses concise: 3 to 6 sentences. Never reveal hidden fields like attacker_progress. \
If containment seems achieved, say it in natural SOC language. \
Avoid providing hacking instructions; focus on defense and incident response.";

/// step 的结果：观测文本、奖励、是否终局
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub observation: String,
    pub reward: f64,
    pub done: bool,
}

pub struct IncidentEnv {
    llm: Arc<dyn LlmClient>,
    templates: Vec<ScenarioTemplate>,
    current: Option<ScenarioInstance>,
    dialog: ConversationMemory,
    done: bool,
    aborted: bool,
    rng: StdRng,
}

impl IncidentEnv {
    /// 使用默认场景目录
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self::with_templates(llm, default_catalog())
    }

    pub fn with_templates(llm: Arc<dyn LlmClient>, templates: Vec<ScenarioTemplate>) -> Self {
        Self {
            llm,
            templates,
            current: None,
            dialog: ConversationMemory::new(),
            done: false,
            aborted: false,
            rng: StdRng::from_entropy(),
        }
    }

    /// 固定场景抽样种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn current(&self) -> Option<&ScenarioInstance> {
        self.current.as_ref()
    }

    pub fn dialog(&self) -> &ConversationMemory {
        &self.dialog
    }

    pub fn last_observation(&self) -> Option<&str> {
        self.dialog.last_assistant()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// 叙事服务累计 token：(prompt, completion, total)
    pub fn token_usage(&self) -> (u64, u64, u64) {
        self.llm.token_usage()
    }

    /// 当前回合是否因叙事服务失败而中止
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// 开始新回合，返回开场观测
    pub async fn reset(&mut self) -> Result<String, SimError> {
        let template = self
            .templates
            .choose(&mut self.rng)
            .ok_or_else(|| SimError::IllegalState("scenario catalog is empty".to_string()))?;
        let instance = template.instantiate();

        let opening = Message::user(format!(
            "Incident description: {}\nCritical host: {}\n\
             Start the scenario. Describe what the analyst initially sees in the SOC tools.",
            template.description, template.critical_asset
        ));
        tracing::debug!("Reset: scenario {}", instance.name());

        self.current = Some(instance);
        self.done = false;
        self.aborted = false;
        self.dialog.restart(Message::system(SYSTEM_PROMPT), opening);

        self.narrate().await
    }

    /// 按标识执行动作：先检查是否已 reset，再校验词表
    pub async fn step_named(&mut self, action: &str) -> Result<StepOutcome, SimError> {
        self.ensure_active()?;
        let action = action.parse::<Action>()?;
        self.step(action).await
    }

    pub async fn step(&mut self, action: Action) -> Result<StepOutcome, SimError> {
        self.ensure_active()?;
        let current = self
            .current
            .as_mut()
            .ok_or_else(|| SimError::IllegalState("call reset() before step()".to_string()))?;

        let summary = current.apply(action)?;
        let reward = current.compute_reward(&summary);
        let done = current.is_done(&summary);
        let prompt = hidden_summary_prompt(current.name(), &summary);
        self.done = done;

        tracing::debug!(
            "Step {} on {}: action={}, reward={:.2}, done={}",
            summary.step,
            current.name(),
            action,
            reward,
            done
        );

        self.dialog.push(Message::user(prompt));
        let observation = self.narrate().await?;

        Ok(StepOutcome {
            observation,
            reward,
            done,
        })
    }

    fn ensure_active(&self) -> Result<(), SimError> {
        if self.current.is_none() {
            return Err(SimError::IllegalState(
                "call reset() before step()".to_string(),
            ));
        }
        if self.aborted {
            return Err(SimError::IllegalState(
                "episode aborted after a narrator failure; call reset() to start a new one"
                    .to_string(),
            ));
        }
        if self.done {
            return Err(SimError::IllegalState(
                "episode is finished; call reset() to start a new one".to_string(),
            ));
        }
        Ok(())
    }

    /// 以当前完整上下文请求一次叙事，并把回复追加进上下文；失败则中止回合
    async fn narrate(&mut self) -> Result<String, SimError> {
        match self.llm.complete(self.dialog.messages()).await {
            Ok(text) => {
                self.dialog.push(Message::assistant(text.clone()));
                Ok(text)
            }
            Err(e) => {
                self.aborted = true;
                tracing::warn!("Narrator failed, episode aborted: {}", e);
                Err(e.into())
            }
        }
    }
}

fn hidden_summary_prompt(name: &str, summary: &StepRecord) -> String {
    format!(
        "Internal incident summary (hidden from analyst):\n\
         - Name: {}\n\
         - Attacker progress level: {}\n\
         - Contained: {}\n\
         - Resolved: {}\n\
         - Last action: {}\n\
         - Notes: {}\n\n\
         Now describe what the analyst sees after this action in realistic SOC terms.",
        name,
        summary.attacker_progress,
        summary.contained,
        summary.resolved,
        summary.action,
        summary.notes.join("; ")
    )
}
