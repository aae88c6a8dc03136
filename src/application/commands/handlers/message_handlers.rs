//! Message Handlers - 消息分发
//!
//! 构建出站信封并发送给远程 agent，失败时降级为离线回复

use std::sync::Arc;

use uuid::Uuid;

use crate::application::commands::handlers::PendingWrites;
use crate::application::commands::SendMessageCommand;
use crate::application::ports::{
    AudioCachePort, AudioTranscoderPort, FileLedgerPort, OutboundEnvelope, RemoteAgentPort,
    SessionManagerPort,
};
use crate::domain::audio::AudioAsset;
use crate::domain::chat::{
    Attachment, ChatResponse, DispatchOutcome, MessageKind, SyntheticResponder, WAV_MIME,
};
use crate::domain::new_uuid;

/// Send Message Handler
///
/// 对调用方是全函数：传输失败、解码失败、非成功状态都不会向上传播
pub struct SendMessageHandler {
    remote: Arc<dyn RemoteAgentPort>,
    transcoder: Arc<dyn AudioTranscoderPort>,
    audio_cache: Arc<dyn AudioCachePort>,
    file_ledger: Arc<dyn FileLedgerPort>,
    session_manager: Arc<dyn SessionManagerPort>,
    responder: SyntheticResponder,
    pending_writes: Arc<PendingWrites>,
}

impl SendMessageHandler {
    pub fn new(
        remote: Arc<dyn RemoteAgentPort>,
        transcoder: Arc<dyn AudioTranscoderPort>,
        audio_cache: Arc<dyn AudioCachePort>,
        file_ledger: Arc<dyn FileLedgerPort>,
        session_manager: Arc<dyn SessionManagerPort>,
    ) -> Self {
        Self {
            remote,
            transcoder,
            audio_cache,
            file_ledger,
            session_manager,
            responder: SyntheticResponder::new(),
            pending_writes: Arc::new(PendingWrites::new()),
        }
    }

    /// 尚未落盘的缓存写入，重置前需要等待
    pub fn pending_writes(&self) -> Arc<PendingWrites> {
        Arc::clone(&self.pending_writes)
    }

    pub async fn handle(&self, cmd: SendMessageCommand) -> DispatchOutcome {
        let session_id = self.session_manager.current_session_id();
        let envelope = self.prepare_envelope(&cmd, session_id).await;

        tracing::debug!(
            session_id = %envelope.session_id,
            kind = %envelope.kind,
            has_text = envelope.text.is_some(),
            attachment_size = envelope.attachment.as_ref().map(Attachment::size),
            "Dispatching message"
        );

        match self.remote.send_message(&envelope).await {
            Ok(response) => {
                tracing::info!(
                    session_id = %envelope.session_id,
                    kind = %envelope.kind,
                    actions = response.actions.len(),
                    "Agent response received"
                );
                DispatchOutcome::Live(response)
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %envelope.session_id,
                    kind = %envelope.kind,
                    error = %e,
                    "Remote agent unavailable, using synthetic response"
                );
                DispatchOutcome::Synthetic(self.synthesize(&cmd))
            }
        }
    }

    /// 构建出站信封
    ///
    /// 录音: 转码 → 缓存（不等待）→ 作为 `audio` 附件，无文字
    /// 文件: 原样附带，content 作为文字提示
    /// 文字: 只有文字
    async fn prepare_envelope(&self, cmd: &SendMessageCommand, session_id: String) -> OutboundEnvelope {
        let (kind, text, attachment) = match (cmd.kind, &cmd.file) {
            (MessageKind::Audio, Some(captured)) => {
                let audio = self.prepare_audio(captured).await;
                (MessageKind::Audio, None, Some(audio))
            }
            (kind, Some(file)) => {
                let kind = if kind == MessageKind::Image {
                    MessageKind::Image
                } else {
                    MessageKind::File
                };
                (kind, Some(cmd.content.clone()), Some(file.clone()))
            }
            (_, None) => (MessageKind::Text, Some(cmd.content.clone()), None),
        };

        OutboundEnvelope {
            kind,
            text,
            attachment,
            session_id,
            user_id: cmd.user_id.clone(),
        }
    }

    async fn prepare_audio(&self, captured: &Attachment) -> Attachment {
        let asset_id = new_uuid();

        let audio = match self.transcoder.transcode_to_wav(captured).await {
            Ok(result) => {
                tracing::debug!(
                    asset_id = %asset_id,
                    original_size = result.original_size,
                    wav_size = result.transcoded_size,
                    sample_rate = result.sample_rate,
                    channels = result.channels,
                    duration_ms = result.duration_ms,
                    "Audio transcoded to WAV"
                );
                Attachment::new(format!("{}.wav", asset_id), WAV_MIME, result.audio_data)
            }
            Err(e) => {
                // 解码失败时按原始类型转发原始字节
                tracing::warn!(
                    file_name = %captured.file_name,
                    mime_type = %captured.mime_type,
                    error = %e,
                    "Audio transcode failed, forwarding original bytes"
                );
                captured.clone()
            }
        };

        self.persist_audio(asset_id, &audio);
        audio
    }

    /// 后台持久化，失败只记录日志；句柄交给 `PendingWrites` 跟踪
    fn persist_audio(&self, asset_id: Uuid, audio: &Attachment) {
        let asset = AudioAsset::new(
            asset_id,
            audio.file_name.clone(),
            audio.mime_type.clone(),
            audio.bytes.clone(),
        );
        let cache = Arc::clone(&self.audio_cache);

        self.pending_writes.spawn_blocking(move || match cache.persist(asset) {
            Ok(()) => tracing::debug!(asset_id = %asset_id, "Audio asset cached"),
            Err(e) => tracing::warn!(
                asset_id = %asset_id,
                error = %e,
                "Failed to persist audio asset"
            ),
        });
    }

    fn synthesize(&self, cmd: &SendMessageCommand) -> ChatResponse {
        if cmd.kind != MessageKind::Audio {
            if let Some(file) = &cmd.file {
                if let Err(e) = self.file_ledger.record(file) {
                    tracing::warn!(
                        file_name = %file.file_name,
                        error = %e,
                        "Failed to record file locally"
                    );
                }
            }
        }
        self.responder.respond(cmd.kind, cmd.file.as_ref())
    }
}
