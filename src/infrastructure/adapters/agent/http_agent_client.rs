//! HTTP Agent Client - 调用远程财务助手 HTTP 服务
//!
//! 实现 RemoteAgentPort trait
//!
//! 远程 API:
//! POST {base}/message  multipart/form-data
//!   字段: message | audio | file, session_id, user_id
//!   Header: X-Session-ID
//!   Response: {"response": "...", "message": "...", "actions": [...]}
//! POST {base}/reset    {"reset": true}

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{OutboundEnvelope, RemoteAgentPort, RemoteError};
use crate::domain::chat::{Attachment, ChatResponse};

/// 会话 ID 请求头
pub const SESSION_HEADER: &str = "X-Session-ID";

/// 远程端没有返回任何文本时的回复
pub const EMPTY_REPLY: &str = "No response from server";

/// 远程回复体
///
/// 所有字段都可能缺失
#[derive(Debug, Default, Deserialize)]
struct AgentReplyBody {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    actions: Option<Vec<String>>,
}

impl AgentReplyBody {
    fn into_response(self) -> ChatResponse {
        let content = self
            .response
            .filter(|s| !s.is_empty())
            .or(self.message.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| EMPTY_REPLY.to_string());

        ChatResponse::text(content).with_actions(self.actions.unwrap_or_default())
    }
}

/// 重置请求体
#[derive(Debug, Serialize)]
struct ResetRequestBody {
    reset: bool,
}

/// HTTP Agent 客户端配置
#[derive(Debug, Clone)]
pub struct HttpAgentClientConfig {
    /// 服务基础 URL（包含 /api 前缀）
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpAgentClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl HttpAgentClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP Agent 客户端
pub struct HttpAgentClient {
    client: Client,
    config: HttpAgentClientConfig,
}

impl HttpAgentClient {
    pub fn new(config: HttpAgentClientConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn message_url(&self) -> String {
        format!("{}/message", self.config.base_url.trim_end_matches('/'))
    }

    fn reset_url(&self) -> String {
        format!("{}/reset", self.config.base_url.trim_end_matches('/'))
    }

    fn file_part(file: &Attachment) -> Part {
        let part = || Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if file.mime_type.is_empty() {
            return part();
        }
        part().mime_str(&file.mime_type).unwrap_or_else(|e| {
            tracing::warn!(mime = %file.mime_type, error = %e, "Ignoring invalid MIME type");
            part()
        })
    }

    fn build_form(envelope: &OutboundEnvelope) -> Form {
        let mut form = Form::new();

        if let Some(text) = &envelope.text {
            form = form.text("message", text.clone());
        }
        if let Some(file) = &envelope.attachment {
            form = form.part(envelope.attachment_field(), Self::file_part(file));
        }

        form = form.text("session_id", envelope.session_id.clone());
        if let Some(user_id) = &envelope.user_id {
            form = form.text("user_id", user_id.clone());
        }

        form
    }
}

fn map_send_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else if e.is_connect() {
        RemoteError::NetworkError(format!("Cannot connect to agent service: {}", e))
    } else {
        RemoteError::NetworkError(e.to_string())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::ServiceError {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RemoteAgentPort for HttpAgentClient {
    async fn send_message(&self, envelope: &OutboundEnvelope) -> Result<ChatResponse, RemoteError> {
        tracing::debug!(
            url = %self.message_url(),
            kind = %envelope.kind,
            session_id = %envelope.session_id,
            attachment_size = envelope.attachment.as_ref().map(|a| a.bytes.len()),
            "Sending message to agent"
        );

        let response = self
            .client
            .post(self.message_url())
            .header(SESSION_HEADER, &envelope.session_id)
            .multipart(Self::build_form(envelope))
            .send()
            .await
            .map_err(map_send_error)?;

        let response = ensure_success(response).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::InvalidResponse(format!("Failed to read body: {}", e)))?;
        let reply: AgentReplyBody = serde_json::from_slice(&body)
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        let reply = reply.into_response();

        tracing::info!(
            session_id = %envelope.session_id,
            content_len = reply.content.len(),
            actions = reply.actions.len(),
            "Agent replied"
        );

        Ok(reply)
    }

    async fn reset_session(&self, session_id: &str) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.reset_url())
            .header(SESSION_HEADER, session_id)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&ResetRequestBody { reset: true })
            .send()
            .await
            .map_err(map_send_error)?;

        ensure_success(response).await?;

        tracing::info!(session_id = %session_id, "Remote session reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::MessageKind;
    use axum::extract::{Multipart, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct SeenField {
        name: String,
        file_name: Option<String>,
        content_type: Option<String>,
        data: Vec<u8>,
    }

    #[derive(Debug, Clone)]
    struct SeenRequest {
        session_header: Option<String>,
        fields: Vec<SeenField>,
        json: Option<Value>,
    }

    type Seen = Arc<Mutex<Vec<SeenRequest>>>;

    fn session_header(headers: &HeaderMap) -> Option<String> {
        headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    async fn record_message(
        State(seen): State<Seen>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> Json<Value> {
        let mut fields = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.unwrap().to_vec();
            fields.push(SeenField {
                name,
                file_name,
                content_type,
                data,
            });
        }
        seen.lock().unwrap().push(SeenRequest {
            session_header: session_header(&headers),
            fields,
            json: None,
        });
        Json(json!({"response": "Your budget looks healthy", "actions": ["View Budget"]}))
    }

    async fn record_reset(
        State(seen): State<Seen>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        seen.lock().unwrap().push(SeenRequest {
            session_header: session_header(&headers),
            fields: Vec::new(),
            json: Some(body),
        });
        StatusCode::OK
    }

    async fn spawn_agent(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    async fn recording_agent() -> (HttpAgentClient, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/api/message", post(record_message))
            .route("/api/reset", post(record_reset))
            .with_state(seen.clone());
        let base_url = spawn_agent(app).await;
        let client = HttpAgentClient::new(HttpAgentClientConfig::new(base_url)).unwrap();
        (client, seen)
    }

    async fn agent_replying(status: StatusCode, body: &'static str) -> HttpAgentClient {
        let app = Router::new().route("/api/message", post(move || async move { (status, body) }));
        let base_url = spawn_agent(app).await;
        HttpAgentClient::new(HttpAgentClientConfig::new(base_url)).unwrap()
    }

    fn envelope(kind: MessageKind, text: Option<&str>, attachment: Option<Attachment>) -> OutboundEnvelope {
        OutboundEnvelope {
            kind,
            text: text.map(str::to_string),
            attachment,
            session_id: "session-1-abc".to_string(),
            user_id: Some("user-7".to_string()),
        }
    }

    #[test]
    fn test_config_default() {
        let config = HttpAgentClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpAgentClientConfig::new("http://example.com:9000/api/").with_timeout(5);
        let client = HttpAgentClient::new(config).unwrap();
        assert_eq!(client.message_url(), "http://example.com:9000/api/message");
        assert_eq!(client.reset_url(), "http://example.com:9000/api/reset");
    }

    #[test]
    fn test_reply_mapping() {
        let reply: AgentReplyBody = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        let reply = reply.into_response();
        assert_eq!(reply.content, "hi");
        assert_eq!(reply.kind, MessageKind::Text);
        assert!(reply.actions.is_empty());

        let reply: AgentReplyBody =
            serde_json::from_str(r#"{"response": "", "message": "", "actions": null}"#).unwrap();
        assert_eq!(reply.into_response().content, EMPTY_REPLY);

        let reply: AgentReplyBody =
            serde_json::from_str(r#"{"response": "first", "message": "second"}"#).unwrap();
        assert_eq!(reply.into_response().content, "first");
    }

    #[tokio::test]
    async fn test_text_message_fields() {
        let (client, seen) = recording_agent().await;

        let reply = client
            .send_message(&envelope(MessageKind::Text, Some("How much did I spend?"), None))
            .await
            .unwrap();

        assert_eq!(reply.content, "Your budget looks healthy");
        assert_eq!(reply.actions, vec!["View Budget".to_string()]);

        let requests = seen.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.session_header.as_deref(), Some("session-1-abc"));
        let names: Vec<&str> = request.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["message", "session_id", "user_id"]);
        assert_eq!(request.fields[0].data, b"How much did I spend?");
        assert_eq!(request.fields[1].data, b"session-1-abc");
    }

    #[tokio::test]
    async fn test_audio_message_fields() {
        let (client, seen) = recording_agent().await;
        let wav = Attachment::new("0b7c.wav", "audio/wav", b"RIFF....WAVE".to_vec());

        client
            .send_message(&envelope(MessageKind::Audio, None, Some(wav)))
            .await
            .unwrap();

        let requests = seen.lock().unwrap().clone();
        let fields = &requests[0].fields;
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["audio", "session_id", "user_id"]);
        assert_eq!(fields[0].file_name.as_deref(), Some("0b7c.wav"));
        assert_eq!(fields[0].content_type.as_deref(), Some("audio/wav"));
        assert_eq!(fields[0].data, b"RIFF....WAVE");
    }

    #[tokio::test]
    async fn test_file_message_fields() {
        let (client, seen) = recording_agent().await;
        let pdf = Attachment::new("statement.pdf", "application/pdf", b"%PDF".to_vec());

        client
            .send_message(&envelope(MessageKind::File, Some("see attached"), Some(pdf)))
            .await
            .unwrap();

        let requests = seen.lock().unwrap().clone();
        let names: Vec<&str> = requests[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["message", "file", "session_id", "user_id"]);
        assert_eq!(requests[0].fields[1].file_name.as_deref(), Some("statement.pdf"));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let client = agent_replying(StatusCode::INTERNAL_SERVER_ERROR, "agent down").await;

        let result = client
            .send_message(&envelope(MessageKind::Text, Some("hi"), None))
            .await;

        match result {
            Err(RemoteError::ServiceError { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "agent down");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let client = agent_replying(StatusCode::OK, "<html>not json</html>").await;

        let result = client
            .send_message(&envelope(MessageKind::Text, Some("hi"), None))
            .await;

        assert!(matches!(result, Err(RemoteError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_agent() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client =
            HttpAgentClient::new(HttpAgentClientConfig::new(format!("http://{}/api", addr))).unwrap();

        let result = client
            .send_message(&envelope(MessageKind::Text, Some("hi"), None))
            .await;

        assert!(matches!(result, Err(RemoteError::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_reset_session() {
        let (client, seen) = recording_agent().await;

        client.reset_session("session-9-xyz").await.unwrap();

        let requests = seen.lock().unwrap().clone();
        assert_eq!(requests[0].session_header.as_deref(), Some("session-9-xyz"));
        assert_eq!(requests[0].json, Some(json!({"reset": true})));
    }
}
