//! 固定动作词表（8 个，有序）
//!
//! 这是交互会话 / 训练器与环境之间的契约：词表之外的字符串一律 InvalidArgument。
//! 顺序同时决定 Agent 贪心选择时的平局裁决。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    InspectAlert,
    InspectEndpointLogs,
    InspectAuthLogs,
    IsolateHost,
    BlockNetworkIndicator,
    ResetCredentials,
    Escalate,
    CloseIncident,
}

impl Action {
    pub const COUNT: usize = 8;

    pub const ALL: [Action; Action::COUNT] = [
        Action::InspectAlert,
        Action::InspectEndpointLogs,
        Action::InspectAuthLogs,
        Action::IsolateHost,
        Action::BlockNetworkIndicator,
        Action::ResetCredentials,
        Action::Escalate,
        Action::CloseIncident,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::InspectAlert => "inspect-alert",
            Action::InspectEndpointLogs => "inspect-endpoint-logs",
            Action::InspectAuthLogs => "inspect-auth-logs",
            Action::IsolateHost => "isolate-host",
            Action::BlockNetworkIndicator => "block-network-indicator",
            Action::ResetCredentials => "reset-credentials",
            Action::Escalate => "escalate",
            Action::CloseIncident => "close-incident",
        }
    }

    /// 在词表中的位置（价值表按此下标存储）
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| SimError::InvalidArgument(format!("Unknown action: {s}")))
    }
}

pub fn available_actions() -> &'static [Action] {
    &Action::ALL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_order_matches_index() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
        assert_eq!(Action::ALL[0], Action::InspectAlert);
        assert_eq!(Action::ALL[7], Action::CloseIncident);
    }

    #[test]
    fn test_parse_known_identifiers() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn test_parse_rejects_outside_vocabulary() {
        for bad in ["", "isolate_host", "Isolate-Host", "wipe-disk", " escalate"] {
            let err = bad.parse::<Action>().unwrap_err();
            assert!(matches!(err, SimError::InvalidArgument(_)), "{bad}");
        }
    }

    #[test]
    fn test_serde_uses_identifiers() {
        let json = serde_json::to_string(&Action::BlockNetworkIndicator).unwrap();
        assert_eq!(json, "\"block-network-indicator\"");
    }
}
