//! Key-Value Audio Cache Implementation
//!
//! 录音以 data URL 形式序列化为 JSON 数组，按插入顺序 FIFO 淘汰

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::AUDIO_FILES_KEY;
use crate::application::ports::{
    AudioCachePort, CacheError, KeyValueStorePort, SessionScopedStore, StorageError,
};
use crate::domain::audio::AudioAsset;

/// 存储格式
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAudioAsset {
    uuid: String,
    name: String,
    #[serde(rename = "type")]
    mime_type: String,
    size: u64,
    /// data:{mime};base64,{payload}
    data: String,
    timestamp: i64,
}

impl StoredAudioAsset {
    fn from_asset(asset: &AudioAsset) -> Self {
        Self {
            uuid: asset.id.to_string(),
            name: asset.display_name.clone(),
            mime_type: asset.mime_kind.clone(),
            size: asset.byte_size,
            data: format!(
                "data:{};base64,{}",
                asset.mime_kind,
                STANDARD.encode(&asset.encoded_data)
            ),
            timestamp: asset.captured_at_epoch_ms,
        }
    }

    fn into_asset(self) -> Result<AudioAsset, CacheError> {
        let invalid = |reason: String| CacheError::InvalidEntry {
            id: self.uuid.clone(),
            reason,
        };

        let id = Uuid::parse_str(&self.uuid).map_err(|e| invalid(e.to_string()))?;
        let payload = self
            .data
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .unwrap_or(&self.data);
        let encoded_data = STANDARD
            .decode(payload)
            .map_err(|e| invalid(e.to_string()))?;

        Ok(AudioAsset {
            id,
            display_name: self.name,
            mime_kind: self.mime_type,
            byte_size: self.size,
            encoded_data,
            captured_at_epoch_ms: self.timestamp,
        })
    }
}

/// 有界录音缓存
///
/// 整个列表存在一个键下，读-改-写必须串行，否则并发写入会互相覆盖
pub struct KvAudioCache {
    store: Arc<dyn KeyValueStorePort>,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl KvAudioCache {
    pub fn new(store: Arc<dyn KeyValueStorePort>, capacity: usize) -> Self {
        Self {
            store,
            capacity: capacity.max(1),
            write_lock: Mutex::new(()),
        }
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn load_entries(&self) -> Result<Vec<StoredAudioAsset>, CacheError> {
        match self.store.get(AUDIO_FILES_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| CacheError::SerializationError(e.to_string())),
            None => Ok(Vec::new()),
        }
    }
}

impl AudioCachePort for KvAudioCache {
    fn persist(&self, asset: AudioAsset) -> Result<(), CacheError> {
        let _guard = self.lock_writes();
        let mut entries = match self.load_entries() {
            Ok(entries) => entries,
            Err(CacheError::SerializationError(e)) => {
                tracing::warn!(error = %e, "Stored audio list is corrupt, starting over");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        entries.push(StoredAudioAsset::from_asset(&asset));

        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
            tracing::debug!(evicted = excess, "Evicted oldest audio assets");
        }

        let json = serde_json::to_string(&entries)
            .map_err(|e| CacheError::SerializationError(e.to_string()))?;
        self.store.set(AUDIO_FILES_KEY, &json)?;

        tracing::debug!(
            asset_id = %asset.id,
            size = asset.byte_size,
            cached = entries.len(),
            "Audio asset cached"
        );

        Ok(())
    }

    fn list(&self) -> Result<Vec<AudioAsset>, CacheError> {
        self.load_entries()?
            .into_iter()
            .map(StoredAudioAsset::into_asset)
            .collect()
    }

    fn clear(&self) -> Result<(), CacheError> {
        let _guard = self.lock_writes();
        self.store.remove(AUDIO_FILES_KEY)?;
        Ok(())
    }
}

impl SessionScopedStore for KvAudioCache {
    fn scope(&self) -> &'static str {
        "audio-files"
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock_writes();
        self.store.remove(AUDIO_FILES_KEY)
    }
}
