//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, StorageBackend};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "FINASSIST";

/// 加载应用配置
///
/// # 环境变量示例
/// - `FINASSIST_AGENT__BASE_URL=http://agent:8000/api`
/// - `FINASSIST_AGENT__USER_ID=alice`
/// - `FINASSIST_STORAGE__BACKEND=memory`
/// - `FINASSIST_CACHE__MAX_ASSETS=20`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值
    builder = builder
        .set_default("agent.base_url", "http://localhost:8000/api")?
        .set_default("agent.timeout_secs", 30)?
        .set_default("storage.backend", "sled")?
        .set_default("storage.sled_path", "data/chat.sled")?
        .set_default("storage.max_upload_size", 10 * 1024 * 1024)?
        .set_default("cache.max_assets", 10)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量，层级分隔符 __
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.agent.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Agent URL cannot be empty".to_string(),
        ));
    }

    if config.agent.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Agent timeout cannot be 0".to_string(),
        ));
    }

    if config.cache.max_assets == 0 {
        return Err(ConfigError::ValidationError(
            "Audio cache must hold at least one asset".to_string(),
        ));
    }

    if config.storage.backend == StorageBackend::Sled
        && config.storage.sled_path.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "Sled path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Agent URL: {}", config.agent.base_url);
    tracing::info!("Agent Timeout: {}s", config.agent.timeout_secs);
    if let Some(user_id) = &config.agent.user_id {
        tracing::info!("User: {}", user_id);
    }
    tracing::info!("Storage Backend: {:?}", config.storage.backend);
    if config.storage.backend == StorageBackend::Sled {
        tracing::info!("Sled Path: {:?}", config.storage.sled_path);
    }
    tracing::info!("Max Upload Size: {} bytes", config.storage.max_upload_size);
    tracing::info!("Audio Cache Size: {}", config.cache.max_assets);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
