//! Key-Value Session Manager Implementation

use chrono::Utc;
use std::sync::{Arc, RwLock};

use super::SESSION_ID_KEY;
use crate::application::ports::{
    KeyValueStorePort, SessionManagerPort, SessionScopedStore, StorageError,
};
use crate::domain::new_id;

const SUFFIX_LEN: usize = 9;

/// 会话 ID 管理
///
/// 内存缓存 + 键值存储持久化，格式 `session-{epoch_ms}-{suffix}`
pub struct KvSessionManager {
    store: Arc<dyn KeyValueStorePort>,
    current: RwLock<Option<String>>,
}

impl KvSessionManager {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    fn mint() -> String {
        let suffix: String = new_id()
            .chars()
            .filter(|c| *c != '-')
            .take(SUFFIX_LEN)
            .collect();
        format!("session-{}-{}", Utc::now().timestamp_millis(), suffix)
    }

    fn load_or_create(&self) -> String {
        let stored = self.store.get(SESSION_ID_KEY).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read stored session id");
            None
        });

        match stored {
            Some(id) if !id.is_empty() => {
                tracing::debug!(session_id = %id, "Session restored");
                id
            }
            _ => {
                let id = Self::mint();
                if let Err(e) = self.store.set(SESSION_ID_KEY, &id) {
                    tracing::warn!(error = %e, "Failed to persist session id");
                }
                tracing::info!(session_id = %id, "Session created");
                id
            }
        }
    }
}

impl SessionManagerPort for KvSessionManager {
    fn current_session_id(&self) -> String {
        {
            let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
            if let Some(id) = guard.as_ref() {
                return id.clone();
            }
        }

        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        if let Some(id) = guard.as_ref() {
            return id.clone();
        }

        let id = self.load_or_create();
        *guard = Some(id.clone());
        id
    }

    /// 删除失败时就地换成新 ID 并覆盖存储，旧 ID 不会被重新加载
    fn invalidate(&self) -> Result<(), StorageError> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());

        match self.store.remove(SESSION_ID_KEY) {
            Ok(()) => {
                *guard = None;
                Ok(())
            }
            Err(e) => {
                let id = Self::mint();
                tracing::warn!(
                    error = %e,
                    session_id = %id,
                    "Failed to remove session id, rotating in place"
                );
                if let Err(set_err) = self.store.set(SESSION_ID_KEY, &id) {
                    tracing::warn!(error = %set_err, "Failed to persist rotated session id");
                }
                *guard = Some(id);
                Err(e)
            }
        }
    }
}

impl SessionScopedStore for KvSessionManager {
    fn scope(&self) -> &'static str {
        "session-id"
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.invalidate()
    }
}
