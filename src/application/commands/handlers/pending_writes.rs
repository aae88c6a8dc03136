//! Pending Writes - 后台写入跟踪
//!
//! 发送路径把缓存写入放到阻塞线程池，重置前必须等它们全部落盘

use std::sync::{Mutex, MutexGuard};

use tokio::task::JoinHandle;

#[derive(Default)]
pub struct PendingWrites {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl PendingWrites {
    pub fn new() -> Self {
        Self::default()
    }

    fn handles(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.handles.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 在阻塞线程池上执行写入并登记句柄
    pub fn spawn_blocking<F>(&self, write: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::task::spawn_blocking(write);
        let mut handles = self.handles();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// 等待已登记的全部写入完成
    pub async fn settle(&self) {
        let handles = std::mem::take(&mut *self.handles());
        if handles.is_empty() {
            return;
        }

        tracing::debug!(pending = handles.len(), "Waiting for background writes");
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Background write task failed");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.handles().iter().filter(|h| !h.is_finished()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_settle_waits_for_slow_writes() {
        let pending = PendingWrites::new();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let done = done.clone();
            pending.spawn_blocking(move || {
                std::thread::sleep(Duration::from_millis(50));
                done.fetch_add(1, Ordering::SeqCst);
            });
        }

        pending.settle().await;

        assert_eq!(done.load(Ordering::SeqCst), 3);
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_settle_survives_panicking_write() {
        let pending = PendingWrites::new();
        pending.spawn_blocking(|| panic!("disk on fire"));

        pending.settle().await;

        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_settle_with_nothing_pending() {
        PendingWrites::new().settle().await;
    }
}
