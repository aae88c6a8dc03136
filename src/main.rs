//! FinAssist - 财务助手命令行客户端
//!
//! 逐行读取输入：
//! - 普通文本作为消息发送
//! - /file <path>    上传文件
//! - /audio <path>   发送录音
//! - /session        显示会话 ID
//! - /history        显示对话记录
//! - /assets         显示本地缓存的录音和文件
//! - /reset          重置会话
//! - /quit           退出

use std::io::Write;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};

use finassist::application::ports::{AudioCachePort, AudioCapturePort};
use finassist::application::{ApplicationError, SendMessageCommand};
use finassist::config::{load_config, print_config, AppConfig};
use finassist::domain::chat::{
    mime_from_extension, Attachment, DispatchOutcome, FileKind, MessageKind, Role,
    TranscriptEntry,
};
use finassist::infrastructure::adapters::FileAudioCapture;
use finassist::infrastructure::{build_runtime, ChatRuntime};

enum ReplCommand<'a> {
    Text(&'a str),
    File(&'a str),
    Audio(&'a str),
    Session,
    History,
    Assets,
    Reset,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> ReplCommand<'_> {
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Text(line);
    };
    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map(|(name, arg)| (name, arg.trim()))
        .unwrap_or((rest, ""));

    match name {
        "file" => ReplCommand::File(arg),
        "audio" => ReplCommand::Audio(arg),
        "session" => ReplCommand::Session,
        "history" => ReplCommand::History,
        "assets" => ReplCommand::Assets,
        "reset" => ReplCommand::Reset,
        "quit" | "exit" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(name),
    }
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!("warn,finassist={}", config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_entry(entry: &TranscriptEntry) {
    let speaker = match entry.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    println!("{}> {}", speaker, entry.content);
    if let Some(image) = &entry.image {
        println!("    (image: {})", image);
    }
    if !entry.actions.is_empty() {
        println!("    [{}]", entry.actions.join(" | "));
    }
}

fn record(runtime: &ChatRuntime, entry: TranscriptEntry) {
    if let Err(e) = runtime.transcript.append(entry) {
        tracing::warn!(error = %e, "Failed to save chat history");
    }
}

/// 发送一轮对话并记录
async fn exchange(
    runtime: &ChatRuntime,
    config: &AppConfig,
    user_entry: TranscriptEntry,
    mut command: SendMessageCommand,
) {
    record(runtime, user_entry);

    if let Some(user_id) = &config.agent.user_id {
        command = command.with_user(user_id.clone());
    }

    let outcome = runtime.client.send(command).await;
    if let DispatchOutcome::Synthetic(_) = &outcome {
        println!("(offline)");
    }

    let entry = TranscriptEntry::assistant(outcome.response());
    print_entry(&entry);
    record(runtime, entry);
}

async fn read_attachment(path: &str) -> anyhow::Result<Attachment> {
    let bytes = tokio::fs::read(path).await?;
    let path = Path::new(path);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    Ok(Attachment::new(file_name, mime_from_extension(extension), bytes))
}

async fn send_file(runtime: &ChatRuntime, config: &AppConfig, path: &str) {
    let file = match read_attachment(path).await {
        Ok(file) => file,
        Err(e) => {
            println!("Cannot read {}: {}", path, e);
            return;
        }
    };

    if let Err(e) = runtime.client.check_upload(&file) {
        println!("{}", e);
        return;
    }

    let kind = match file.file_kind() {
        FileKind::Image => MessageKind::Image,
        _ => MessageKind::File,
    };
    let user_entry = TranscriptEntry::user(format!("[{}] {}", kind, file.file_name), kind);
    let mut command = SendMessageCommand::file("", file);
    command.kind = kind;
    exchange(runtime, config, user_entry, command).await;
}

async fn send_audio(runtime: &ChatRuntime, config: &AppConfig, path: &str) {
    let capture = FileAudioCapture::new(path);

    let captured = async {
        capture.start().await?;
        capture.stop().await
    }
    .await
    .map_err(ApplicationError::from);

    match captured {
        Ok(captured) => {
            let user_entry = TranscriptEntry::user("[voice message]", MessageKind::Audio);
            exchange(runtime, config, user_entry, SendMessageCommand::audio(captured)).await;
        }
        Err(e) if e.is_permission_denied() => {
            println!("Unable to access microphone. Please check permissions. ({})", e);
        }
        Err(e) => println!("Recording failed: {}", e),
    }
}

fn show_assets(runtime: &ChatRuntime) {
    match runtime.audio_cache.list() {
        Ok(assets) if assets.is_empty() => println!("No cached recordings."),
        Ok(assets) => {
            println!("Cached recordings:");
            for asset in assets {
                println!(
                    "  {}  {}  {} bytes",
                    asset.display_name, asset.mime_kind, asset.byte_size
                );
            }
        }
        Err(e) => println!("Cannot read cached recordings: {}", e),
    }

    match runtime.file_ledger.list() {
        Ok(files) if files.is_empty() => {}
        Ok(files) => {
            println!("Files received offline:");
            for file in files {
                println!("  {}  {}  {} bytes", file.name, file.mime_type, file.size);
            }
        }
        Err(e) => println!("Cannot read file list: {}", e),
    }
}

async fn reset(runtime: &ChatRuntime) {
    match runtime.client.reset().await {
        Ok(response) => {
            tracing::info!(
                previous_session_id = %response.previous_session_id,
                "Chat reset"
            );
            println!("Chat reset.");
        }
        Err(e) => println!("Remote reset failed ({}); local history cleared.", e),
    }

    for entry in runtime.transcript.load() {
        print_entry(&entry);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    tracing::info!("FinAssist - 财务助手对话客户端");
    print_config(&config);

    let runtime = build_runtime(&config)?;

    for entry in runtime.transcript.load() {
        print_entry(&entry);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_command(line) {
            ReplCommand::Text(text) => {
                let user_entry = TranscriptEntry::user(text, MessageKind::Text);
                exchange(&runtime, &config, user_entry, SendMessageCommand::text(text)).await;
            }
            ReplCommand::File("") => println!("Usage: /file <path>"),
            ReplCommand::File(path) => send_file(&runtime, &config, path).await,
            ReplCommand::Audio("") => println!("Usage: /audio <path>"),
            ReplCommand::Audio(path) => send_audio(&runtime, &config, path).await,
            ReplCommand::Session => println!("{}", runtime.client.current_session_id()),
            ReplCommand::History => {
                for entry in runtime.transcript.load() {
                    print_entry(&entry);
                }
            }
            ReplCommand::Assets => show_assets(&runtime),
            ReplCommand::Reset => reset(&runtime).await,
            ReplCommand::Quit => break,
            ReplCommand::Unknown(name) => println!("Unknown command: /{}", name),
        }
    }

    runtime.flush()?;
    tracing::info!("Bye");
    Ok(())
}
