//! 记忆层：角色消息与单回合叙事对话记录

pub mod conversation;

pub use conversation::{ConversationMemory, Message, Role};
