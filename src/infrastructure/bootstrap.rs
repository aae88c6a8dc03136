//! 依赖装配
//!
//! 按配置选择存储后端，把适配器注入应用层处理器

use std::sync::Arc;
use thiserror::Error;

use crate::application::commands::handlers::{ResetChatHandler, SendMessageHandler};
use crate::application::ports::{
    AudioDecoderPort, KeyValueStorePort, RemoteAgentPort, RemoteError, SessionScopedStore,
    StorageError,
};
use crate::application::ChatClient;
use crate::config::{AppConfig, StorageBackend, StorageConfig};
use crate::infrastructure::adapters::{
    HttpAgentClient, HttpAgentClientConfig, SymphoniaDecoder, WavTranscoder,
};
use crate::infrastructure::memory::InMemoryKeyValueStore;
use crate::infrastructure::persistence::kv::{
    KvAudioCache, KvFileLedger, KvSessionManager, TranscriptStore,
};
use crate::infrastructure::persistence::sled::SledKeyValueStore;

/// 装配错误
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Storage unavailable: {0}")]
    Storage(#[from] StorageError),

    #[error("Agent client unavailable: {0}")]
    Remote(#[from] RemoteError),
}

/// 装配完成的运行时
pub struct ChatRuntime {
    pub client: ChatClient,
    pub transcript: Arc<TranscriptStore>,
    pub audio_cache: Arc<KvAudioCache>,
    pub file_ledger: Arc<KvFileLedger>,
    store: Arc<dyn KeyValueStorePort>,
}

impl ChatRuntime {
    /// 退出前刷新存储
    pub fn flush(&self) -> Result<(), StorageError> {
        self.store.flush()
    }
}

/// 打开配置的键值存储
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStorePort>, StorageError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryKeyValueStore::new())),
        StorageBackend::Sled => Ok(Arc::new(SledKeyValueStore::open(&config.sled_path)?)),
    }
}

/// 使用真实适配器装配运行时
pub fn build_runtime(config: &AppConfig) -> Result<ChatRuntime, BootstrapError> {
    let store = open_store(&config.storage)?;

    let agent_config = HttpAgentClientConfig::new(&config.agent.base_url)
        .with_timeout(config.agent.timeout_secs);
    let remote = Arc::new(HttpAgentClient::new(agent_config)?);

    Ok(assemble(config, store, remote, Arc::new(SymphoniaDecoder::new())))
}

/// 使用给定的存储、远程通道和解码器装配运行时
pub fn assemble(
    config: &AppConfig,
    store: Arc<dyn KeyValueStorePort>,
    remote: Arc<dyn RemoteAgentPort>,
    decoder: Arc<dyn AudioDecoderPort>,
) -> ChatRuntime {
    let sessions = Arc::new(KvSessionManager::new(store.clone()));
    let transcript = Arc::new(TranscriptStore::new(store.clone()));
    let file_ledger = Arc::new(KvFileLedger::new(store.clone()));
    let audio_cache = Arc::new(KvAudioCache::new(store.clone(), config.cache.max_assets));
    let transcoder = Arc::new(WavTranscoder::new(decoder));

    let send_handler = SendMessageHandler::new(
        remote.clone(),
        transcoder,
        audio_cache.clone(),
        file_ledger.clone(),
        sessions.clone(),
    );
    let reset_handler = ResetChatHandler::new(
        remote,
        sessions.clone(),
        vec![
            sessions.clone() as Arc<dyn SessionScopedStore>,
            transcript.clone() as Arc<dyn SessionScopedStore>,
            file_ledger.clone() as Arc<dyn SessionScopedStore>,
            audio_cache.clone() as Arc<dyn SessionScopedStore>,
        ],
    );

    let client = ChatClient::new(send_handler, reset_handler, sessions)
        .with_max_upload_size(config.storage.max_upload_size);

    tracing::debug!(
        backend = ?config.storage.backend,
        max_assets = audio_cache.capacity(),
        "Chat runtime assembled"
    );

    ChatRuntime {
        client,
        transcript,
        audio_cache,
        file_ledger,
        store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AudioCachePort, FileLedgerPort};
    use crate::application::testing::{stereo_buffer, wait_for_assets, FakeDecoder, FakeRemote};
    use crate::application::SendMessageCommand;
    use crate::domain::chat::{Attachment, ChatResponse, MessageKind, TranscriptEntry};
    use tempfile::tempdir;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.cache.max_assets = 2;
        config
    }

    fn memory_runtime(remote: FakeRemote) -> ChatRuntime {
        let config = memory_config();
        let store = open_store(&config.storage).unwrap();
        assemble(
            &config,
            store,
            Arc::new(remote),
            Arc::new(FakeDecoder::ok(stereo_buffer(4))),
        )
    }

    #[test]
    fn test_open_sled_store() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Sled,
            sled_path: dir.path().join("chat.sled"),
            max_upload_size: 1,
        };

        let store = open_store(&config).unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_cache_capacity_follows_config() {
        let runtime = memory_runtime(FakeRemote::answering(ChatResponse::text("ok")));

        for i in 0..3 {
            let take = Attachment::new(format!("take-{}.webm", i), "audio/webm", vec![1]);
            runtime.client.send(SendMessageCommand::audio(take)).await;
            wait_for_assets(runtime.audio_cache.as_ref(), (i + 1).min(2)).await;
        }

        // 后台持久化可能仍在进行
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(runtime.audio_cache.list().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reset_clears_transcript_and_ledger() {
        let runtime = memory_runtime(FakeRemote::answering(ChatResponse::text("ok")));
        runtime
            .transcript
            .append(TranscriptEntry::user("hello", MessageKind::Text))
            .unwrap();
        runtime
            .file_ledger
            .record(&Attachment::new("a.pdf", "application/pdf", vec![1]))
            .unwrap();

        runtime.client.reset().await.unwrap();

        assert!(runtime.transcript.stored().unwrap().is_none());
        assert!(runtime.file_ledger.list().unwrap().is_empty());
        runtime.flush().unwrap();
    }

    #[test]
    fn test_upload_limit_follows_config() {
        let mut config = memory_config();
        config.storage.max_upload_size = 4;
        let runtime = assemble(
            &config,
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::new(FakeRemote::failing()),
            Arc::new(FakeDecoder::failing()),
        );

        assert!(runtime
            .client
            .check_upload(&Attachment::new("big.bin", "", vec![0; 5]))
            .is_err());
        assert!(runtime
            .client
            .check_upload(&Attachment::new("ok.bin", "", vec![0; 4]))
            .is_ok());
    }
}
