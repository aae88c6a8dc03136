//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::{DEFAULT_MAX_UPLOAD_SIZE, MAX_AUDIO_ASSETS};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 远程 agent 配置
    #[serde(default)]
    pub agent: AgentConfig,

    /// 本地存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 录音缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 远程 agent 配置
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// 服务基础 URL（包含 /api 前缀）
    #[serde(default = "default_agent_url")]
    pub base_url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_agent_timeout")]
    pub timeout_secs: u64,

    /// 随消息发送的用户标识
    #[serde(default)]
    pub user_id: Option<String>,
}

fn default_agent_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_agent_timeout() -> u64 {
    30
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: default_agent_url(),
            timeout_secs: default_agent_timeout(),
            user_id: None,
        }
    }
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// 进程内存，退出即丢失
    Memory,
    /// Sled 嵌入式数据库
    #[default]
    Sled,
}

/// 本地存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Sled 数据库路径
    #[serde(default = "default_sled_path")]
    pub sled_path: PathBuf,

    /// 上传文件大小上限（字节）
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_sled_path() -> PathBuf {
    PathBuf::from("data/chat.sled")
}

fn default_max_upload_size() -> u64 {
    DEFAULT_MAX_UPLOAD_SIZE
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            sled_path: default_sled_path(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 录音缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 最多保留的录音数量
    #[serde(default = "default_max_assets")]
    pub max_assets: usize,
}

fn default_max_assets() -> usize {
    MAX_AUDIO_ASSETS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_assets: default_max_assets(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
