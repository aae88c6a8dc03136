//! 远程 agent 客户端

mod http_agent_client;

pub use http_agent_client::{HttpAgentClient, HttpAgentClientConfig, EMPTY_REPLY, SESSION_HEADER};
