//! 演练报告：时间线构建 + 渲染边界
//!
//! 时间线格式：`Scenario start:`、场景文本、空行，然后每步 `N. Action: <id>` 与
//! `   Outcome: <单行文本，超过 350 字符截断>`。渲染器输出不透明字节（Markdown 为默认实现）。

use chrono::Local;
use serde::Serialize;

use crate::core::SimError;
use crate::scenario::Action;
use crate::scoring::HumanScore;

/// Outcome 行的最大字符数
pub const OUTCOME_MAX_CHARS: usize = 350;

/// 会话事件日志条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionEvent {
    Scenario(String),
    Action(Action),
    Observation(String),
}

/// 折叠为单行并按字符截断
pub fn truncate_outcome(text: &str) -> String {
    let single_line = text.trim().replace('\n', " ");
    if single_line.chars().count() > OUTCOME_MAX_CHARS {
        let cut: String = single_line.chars().take(OUTCOME_MAX_CHARS).collect();
        format!("{cut}...")
    } else {
        single_line
    }
}

pub fn build_timeline(events: &[SessionEvent]) -> Vec<String> {
    let mut timeline = Vec::new();
    let mut step = 0;
    for event in events {
        match event {
            SessionEvent::Scenario(text) => {
                timeline.push("Scenario start:".to_string());
                timeline.push(text.trim().to_string());
                timeline.push(String::new());
            }
            SessionEvent::Action(action) => {
                step += 1;
                timeline.push(format!("{step}. Action: {action}"));
            }
            SessionEvent::Observation(text) => {
                timeline.push(format!("   Outcome: {}", truncate_outcome(text)));
            }
        }
    }
    timeline
}

/// 渲染器输入
#[derive(Debug, Clone, Serialize)]
pub struct ReportInput {
    pub scenario_text: String,
    pub timeline: Vec<String>,
    pub score: HumanScore,
}

/// 报告渲染边界：给定结构化输入，返回文档字节
pub trait ReportRenderer {
    /// 建议的文件扩展名
    fn extension(&self) -> &'static str;

    fn render(&self, input: &ReportInput) -> Result<Vec<u8>, SimError>;
}

#[derive(Debug, Default)]
pub struct MarkdownReportRenderer;

impl ReportRenderer for MarkdownReportRenderer {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, input: &ReportInput) -> Result<Vec<u8>, SimError> {
        let mut out = String::new();
        out.push_str("# Cyber Incident Response Training Report\n\n");
        out.push_str(&format!(
            "Date: {}  \nReport ID: {}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            uuid::Uuid::new_v4()
        ));

        out.push_str("## Scenario Summary\n\n");
        out.push_str(input.scenario_text.trim());
        out.push_str("\n\n## Action Timeline\n\n");
        for line in &input.timeline {
            out.push_str(line);
            out.push('\n');
        }

        out.push_str("\n## Final Score\n\n");
        out.push_str(&format!("Score: {}/100  \n", input.score.score));
        out.push_str(&format!("Readiness Level: {}\n", input.score.tier));

        if !input.score.feedback.is_empty() {
            out.push_str("\n## Learning Feedback\n\n");
            for item in &input.score.feedback {
                out.push_str(&format!("- {item}\n"));
            }
        }

        Ok(out.into_bytes())
    }
}
