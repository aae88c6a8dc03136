//! FinAssist - 财务助手对话客户端
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Chat Context: 消息类型、回复、离线回复生成、对话记录
//! - Audio Context: PCM 缓冲区、录音资产
//!
//! 应用层 (application/):
//! - Ports: 端口定义（RemoteAgent, KeyValueStore, AudioCache, AudioTranscoder, SessionManager）
//! - Commands: 发送消息 / 重置会话
//! - ChatClient: 展示层门面
//!
//! 基础设施层 (infrastructure/):
//! - Memory: 内存键值存储
//! - Persistence: Sled 存储 + 会话范围状态
//! - Adapters: HTTP agent client, Symphonia 解码, WAV 编码, 文件录音
//! - Bootstrap: 依赖装配

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
