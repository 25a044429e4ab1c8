//! Mock 叙事客户端（离线训练与测试用，无需 API）
//!
//! 取最后一条 User 消息：开场轮次复述公开描述；行动轮次把隐藏摘要中的 Notes 转述为分析员可见的现象，
//! 并在摘要标记 Contained 时给出遏制迹象。从不复述攻击进度数值。

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError};
use crate::memory::{Message, Role};

/// Mock 客户端：确定性叙事
#[derive(Debug, Default)]
pub struct MockLlmClient;

fn field<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(prefix))
        .map(str::trim)
}

impl MockLlmClient {
    fn narrate_opening(prompt: &str) -> String {
        let description = field(prompt, "Incident description:").unwrap_or("An alert fired.");
        let host = field(prompt, "Critical host:").unwrap_or("N/A");
        format!("SOC console shows a new alert. {description} Affected asset: {host}.")
    }

    fn narrate_step(prompt: &str) -> String {
        let notes = field(prompt, "- Notes:").unwrap_or("");
        let contained = field(prompt, "- Contained:") == Some("true");
        let resolved = field(prompt, "- Resolved:") == Some("true");

        let mut text = String::from("Analyst observes: ");
        if notes.is_empty() {
            text.push_str("no new telemetry.");
        } else {
            text.push_str(notes);
        }
        if resolved {
            text.push_str(" The ticket is closed and the incident is contained.");
        } else if contained {
            text.push_str(" Telemetry indicates the threat is contained.");
        } else {
            text.push_str(" Suspicious activity is still being reported.");
        }
        text
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .ok_or(LlmError::EmptyResponse)?;

        if last_user.contains("- Notes:") {
            Ok(Self::narrate_step(last_user))
        } else {
            Ok(Self::narrate_opening(last_user))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_opening_restates_description() {
        let prompt = "Incident description: Outbound traffic to a C2 domain.\nCritical host: WEB-SRV-10\nStart the scenario.";
        let text = MockLlmClient.complete(&[Message::user(prompt)]).await.unwrap();
        assert!(text.contains("C2 domain"));
        assert!(text.contains("WEB-SRV-10"));
    }

    #[tokio::test]
    async fn test_step_hides_progress() {
        let prompt = "Internal incident summary (hidden from analyst):\n- Name: c2_beaconing\n- Attacker progress level: 3\n- Contained: true\n- Resolved: false\n- Last action: block-network-indicator\n- Notes: Outbound beaconing stops.";
        let text = MockLlmClient.complete(&[Message::user(prompt)]).await.unwrap();
        assert!(text.contains("beaconing"));
        assert!(text.contains("contained"));
        assert!(!text.contains("progress"));
    }

    #[tokio::test]
    async fn test_no_user_turn() {
        let err = MockLlmClient
            .complete(&[Message::system("sys")])
            .await
            .unwrap_err();
        assert_eq!(err, LlmError::EmptyResponse);
    }
}
