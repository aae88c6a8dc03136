//! File Audio Capture - 从文件读取录音
//!
//! 终端环境没有麦克风，start/stop 之间由外部程序写入录音文件，
//! stop 时读取文件内容作为采集结果

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::application::ports::{AudioCapturePort, CaptureError};
use crate::domain::chat::{mime_from_extension, Attachment};

/// 文件录音采集
pub struct FileAudioCapture {
    path: PathBuf,
    started_at: Mutex<Option<DateTime<Utc>>>,
}

impl FileAudioCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            started_at: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn map_io_error(&self, e: io::Error) -> CaptureError {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                CaptureError::PermissionDenied(self.path.display().to_string())
            }
            _ => CaptureError::IoError(format!("{}: {}", self.path.display(), e)),
        }
    }

    fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "wav".to_string())
    }
}

#[async_trait]
impl AudioCapturePort for FileAudioCapture {
    async fn start(&self) -> Result<(), CaptureError> {
        let mut started_at = self.started_at.lock().await;
        if started_at.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }

        // 尽早暴露权限问题；文件可以在 stop 前才出现
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::metadata(dir)
                .await
                .map_err(|e| self.map_io_error(e))?;
        }

        *started_at = Some(Utc::now());
        tracing::info!(path = %self.path.display(), "Recording started");
        Ok(())
    }

    async fn stop(&self) -> Result<Attachment, CaptureError> {
        let started = self
            .started_at
            .lock()
            .await
            .take()
            .ok_or(CaptureError::NotRecording)?;

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.map_io_error(e))?;

        let ext = self.extension();
        let file_name = format!("recording-{}.{}", started.timestamp_millis(), ext);
        let mime_type = mime_from_extension(&ext);

        tracing::info!(
            file_name = %file_name,
            mime = mime_type,
            size = bytes.len(),
            "Recording stopped"
        );

        Ok(Attachment::new(file_name, mime_type, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_start_stop_reads_recording() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("take.webm");
        let capture = FileAudioCapture::new(&path);

        capture.start().await.unwrap();
        tokio::fs::write(&path, [0x1a, 0x45, 0xdf, 0xa3]).await.unwrap();
        let recording = capture.stop().await.unwrap();

        assert!(recording.file_name.starts_with("recording-"));
        assert!(recording.file_name.ends_with(".webm"));
        assert_eq!(recording.mime_type, "audio/webm");
        assert_eq!(recording.bytes, vec![0x1a, 0x45, 0xdf, 0xa3]);
    }

    #[tokio::test]
    async fn test_stop_without_start() {
        let capture = FileAudioCapture::new("unused.wav");

        assert!(matches!(capture.stop().await, Err(CaptureError::NotRecording)));
    }

    #[tokio::test]
    async fn test_double_start() {
        let dir = tempdir().unwrap();
        let capture = FileAudioCapture::new(dir.path().join("take.wav"));

        capture.start().await.unwrap();
        assert!(matches!(capture.start().await, Err(CaptureError::AlreadyRecording)));
    }

    #[tokio::test]
    async fn test_missing_recording_is_io_error() {
        let dir = tempdir().unwrap();
        let capture = FileAudioCapture::new(dir.path().join("never-written.wav"));

        capture.start().await.unwrap();
        assert!(matches!(capture.stop().await, Err(CaptureError::IoError(_))));

        // stop 失败后状态已复位
        assert!(matches!(capture.stop().await, Err(CaptureError::NotRecording)));
    }
}
