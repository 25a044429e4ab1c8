//! 叙事对话记录
//!
//! 一个回合内与叙事服务的完整上下文（system + user/assistant 轮次），只增不减；
//! 叙事服务本身无状态，每次调用都需完整重发。新回合 reset 时整体丢弃。

use serde::{Deserialize, Serialize};

/// 消息角色（与 LLM API 一致）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
    System,
}

/// 单条消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// 回合级对话记录：不做剪枝
#[derive(Clone, Debug, Default)]
pub struct ConversationMemory {
    messages: Vec<Message>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 system + 首条 user 重新开始（丢弃旧回合的全部上下文）
    pub fn restart(&mut self, system: Message, opening: Message) {
        self.messages.clear();
        self.messages.push(system);
        self.messages.push(opening);
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_assistant(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_discards_previous_turns() {
        let mut memory = ConversationMemory::new();
        memory.restart(Message::system("sys"), Message::user("open"));
        memory.push(Message::assistant("first view"));
        memory.push(Message::user("step"));
        assert_eq!(memory.len(), 4);

        memory.restart(Message::system("sys"), Message::user("again"));
        assert_eq!(memory.len(), 2);
        assert_eq!(memory.messages()[1].content, "again");
        assert!(memory.last_assistant().is_none());
    }

    #[test]
    fn test_no_pruning() {
        let mut memory = ConversationMemory::new();
        for i in 0..100 {
            memory.push(Message::user(format!("turn {i}")));
        }
        assert_eq!(memory.len(), 100);
    }
}
