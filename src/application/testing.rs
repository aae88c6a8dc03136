//! 测试替身

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{
    AudioCachePort, AudioDecoderPort, DecodeError, KeyValueStorePort, OutboundEnvelope,
    RemoteAgentPort, RemoteError, StorageError,
};
use crate::domain::audio::{AudioAsset, PcmBuffer};
use crate::domain::chat::ChatResponse;

/// 可切换成功/失败的远程 agent，记录收到的请求
pub struct FakeRemote {
    reply: ChatResponse,
    failing: AtomicBool,
    envelopes: Mutex<Vec<OutboundEnvelope>>,
    resets: Mutex<Vec<String>>,
}

impl FakeRemote {
    pub fn answering(reply: ChatResponse) -> Self {
        Self {
            reply,
            failing: AtomicBool::new(false),
            envelopes: Mutex::new(Vec::new()),
            resets: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        let remote = Self::answering(ChatResponse::text("unreachable"));
        remote.set_failing(true);
        remote
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn envelopes(&self) -> Vec<OutboundEnvelope> {
        self.envelopes.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) -> Vec<String> {
        self.resets.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteAgentPort for FakeRemote {
    async fn send_message(&self, envelope: &OutboundEnvelope) -> Result<ChatResponse, RemoteError> {
        self.envelopes.lock().unwrap().push(envelope.clone());
        if self.failing.load(Ordering::SeqCst) {
            Err(RemoteError::NetworkError("connection refused".to_string()))
        } else {
            Ok(self.reply.clone())
        }
    }

    async fn reset_session(&self, session_id: &str) -> Result<(), RemoteError> {
        self.resets.lock().unwrap().push(session_id.to_string());
        if self.failing.load(Ordering::SeqCst) {
            Err(RemoteError::ServiceError {
                status: 500,
                body: "internal error".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

/// 固定结果的解码器
pub struct FakeDecoder {
    buffer: Option<PcmBuffer>,
}

impl FakeDecoder {
    pub fn ok(buffer: PcmBuffer) -> Self {
        Self {
            buffer: Some(buffer),
        }
    }

    pub fn failing() -> Self {
        Self { buffer: None }
    }
}

#[async_trait]
impl AudioDecoderPort for FakeDecoder {
    async fn decode(&self, _data: &[u8], mime_type: &str) -> Result<PcmBuffer, DecodeError> {
        self.buffer
            .clone()
            .ok_or_else(|| DecodeError::UnsupportedFormat(mime_type.to_string()))
    }
}

/// 所有操作都失败的存储
pub struct FailingStore;

impl KeyValueStorePort for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::DatabaseError("disk unavailable".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::DatabaseError("disk unavailable".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::DatabaseError("disk unavailable".to_string()))
    }
}

/// 16kHz 立体声，左声道递增、右声道取反
pub fn stereo_buffer(frames: usize) -> PcmBuffer {
    let left: Vec<f32> = (0..frames).map(|i| i as f32 / frames.max(1) as f32).collect();
    let right: Vec<f32> = left.iter().map(|s| -s).collect();
    PcmBuffer::new(16000, vec![left, right]).unwrap()
}

/// 等待后台持久化完成
pub async fn wait_for_assets(cache: &dyn AudioCachePort, expected: usize) -> Vec<AudioAsset> {
    for _ in 0..400 {
        if let Ok(assets) = cache.list() {
            if assets.len() >= expected {
                return assets;
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("audio cache never reached {} assets", expected);
}
