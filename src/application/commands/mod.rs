//! 应用层 - 命令
//!
//! 发送消息与重置会话

mod chat_commands;

pub mod handlers;

pub use chat_commands::*;
