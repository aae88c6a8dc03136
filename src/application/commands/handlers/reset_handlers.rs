//! Reset Handlers - 会话重置
//!
//! 两阶段: 通知远程作废会话，然后无条件清除本地会话状态

use std::sync::Arc;

use crate::application::commands::handlers::PendingWrites;
use crate::application::commands::ResetChatResponse;
use crate::application::error::ApplicationError;
use crate::application::ports::{RemoteAgentPort, SessionManagerPort, SessionScopedStore};

/// Reset Chat Handler
pub struct ResetChatHandler {
    remote: Arc<dyn RemoteAgentPort>,
    session_manager: Arc<dyn SessionManagerPort>,
    scopes: Vec<Arc<dyn SessionScopedStore>>,
    pending_writes: Option<Arc<PendingWrites>>,
}

impl ResetChatHandler {
    /// `scopes` 是重置时需要清除的全部本地状态（含会话 ID 本身）
    pub fn new(
        remote: Arc<dyn RemoteAgentPort>,
        session_manager: Arc<dyn SessionManagerPort>,
        scopes: Vec<Arc<dyn SessionScopedStore>>,
    ) -> Self {
        Self {
            remote,
            session_manager,
            scopes,
            pending_writes: None,
        }
    }

    /// 清除前先等待这些后台写入，避免旧会话的数据在重置后落盘
    pub fn with_pending_writes(mut self, pending: Arc<PendingWrites>) -> Self {
        self.pending_writes = Some(pending);
        self
    }

    /// 远程失败会返回错误，但本地状态总会被清除
    pub async fn handle(&self) -> Result<ResetChatResponse, ApplicationError> {
        let session_id = self.session_manager.current_session_id();

        let remote_result = self.remote.reset_session(&session_id).await;

        if let Some(pending) = &self.pending_writes {
            pending.settle().await;
        }
        let (cleared_scopes, failed_scopes) = self.clear_local_state();

        match remote_result {
            Ok(()) => {
                tracing::info!(
                    session_id = %session_id,
                    cleared = ?cleared_scopes,
                    "Chat session reset"
                );
                Ok(ResetChatResponse {
                    previous_session_id: session_id,
                    cleared_scopes,
                    failed_scopes,
                })
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Remote reset failed, local state cleared anyway"
                );
                Err(e.into())
            }
        }
    }

    fn clear_local_state(&self) -> (Vec<&'static str>, Vec<&'static str>) {
        let mut cleared = Vec::with_capacity(self.scopes.len());
        let mut failed = Vec::new();

        for scope in &self.scopes {
            match scope.clear() {
                Ok(()) => cleared.push(scope.scope()),
                Err(e) => {
                    tracing::warn!(scope = scope.scope(), error = %e, "Failed to clear local state");
                    failed.push(scope.scope());
                }
            }
        }

        (cleared, failed)
    }
}
