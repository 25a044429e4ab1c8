//! 观测编码：叙事文本 → 离散状态键
//!
//! Agent 只看到分析员能看到的文字，不接触隐藏状态。关键词启发式是有意的粗粒度观测函数，
//! 放在 StateEncoder trait 之后，可替换为更丰富的特征提取而不影响 Agent / Trainer。

use serde::Serialize;

/// 四个布尔特征组成的查表键，仅用于 Q 表索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct StateKey {
    pub mentions_ransom: bool,
    pub mentions_account: bool,
    pub mentions_network: bool,
    pub mentions_containment: bool,
}

/// 文本到状态键的纯函数接口
pub trait StateEncoder {
    fn encode(&self, text: &str) -> StateKey;
}

const RANSOM_KEYWORDS: &[&str] = &["ransom", "encryption", "encrypt"];
const ACCOUNT_KEYWORDS: &[&str] = &["login", "credentials", "account"];
const NETWORK_KEYWORDS: &[&str] = &["network", "traffic", "beacon", "c2"];
const CONTAINMENT_KEYWORDS: &[&str] = &["contained", "isolated", "blocked", "mitigated"];

/// 大小写不敏感的子串匹配
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordEncoder;

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

impl StateEncoder for KeywordEncoder {
    fn encode(&self, text: &str) -> StateKey {
        let t = text.to_lowercase();
        StateKey {
            mentions_ransom: mentions_any(&t, RANSOM_KEYWORDS),
            mentions_account: mentions_any(&t, ACCOUNT_KEYWORDS),
            mentions_network: mentions_any(&t, NETWORK_KEYWORDS),
            mentions_containment: mentions_any(&t, CONTAINMENT_KEYWORDS),
        }
    }
}

pub fn encode_state(text: &str) -> StateKey {
    KeywordEncoder.encode(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert_eq!(encode_state(""), StateKey::default());
    }

    #[test]
    fn test_case_insensitive() {
        let key = encode_state("RANSOM note found; Host ISOLATED");
        assert!(key.mentions_ransom);
        assert!(key.mentions_containment);
        assert!(!key.mentions_account);
        assert!(!key.mentions_network);
    }

    #[test]
    fn test_all_features() {
        let key = encode_state(
            "Encryption activity, a suspicious Login, outbound Traffic, and the threat is contained.",
        );
        assert_eq!(
            key,
            StateKey {
                mentions_ransom: true,
                mentions_account: true,
                mentions_network: true,
                mentions_containment: true,
            }
        );
    }

    #[test]
    fn test_deterministic() {
        let text = "C2 beacon to a known domain";
        assert_eq!(encode_state(text), encode_state(text));
        assert!(encode_state(text).mentions_network);
    }
}
