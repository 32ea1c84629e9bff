use crate::analysis::{AnalysisClient, FactCheckPipeline, PROCESSING_ERROR_MESSAGE};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::thread::sleep;
use std::time::Duration;
use tracing::{error, info, warn};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
pub const GREETING_MESSAGE: &str =
    "Hello! Send me a news article or claim, and I'll analyze it for you.";
pub const UNSUPPORTED_MESSAGE: &str =
    "Sorry, I couldn't process your message. Please send either text or an image.";

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub date: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramFile {
    pub file_id: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// What an inbound message asks for.
#[derive(Debug, PartialEq)]
pub enum Inbound<'a> {
    Start,
    Photo { photo: &'a PhotoSize, caption: &'a str },
    Text(&'a str),
    Unsupported,
}

static COMMAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/([A-Za-z0-9_]+)(?:@[A-Za-z0-9_]+)?(?:\s|$)").expect("valid regex"));

/// Command name of a `/command` or `/command@BotName` message.
pub fn parse_command(text: &str) -> Option<&str> {
    COMMAND_RE
        .captures(text.trim_start())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn classify(message: &Message) -> Inbound<'_> {
    // Telegram lists photo sizes smallest first.
    if let Some(photo) = message.photo.last() {
        return Inbound::Photo {
            photo,
            caption: message.caption.as_deref().unwrap_or(""),
        };
    }
    match message.text.as_deref() {
        Some(text) if parse_command(text) == Some("start") => Inbound::Start,
        Some(text) if !text.trim().is_empty() => Inbound::Text(text),
        _ => Inbound::Unsupported,
    }
}

pub fn describe_sender(message: &Message) -> String {
    let (display, id, first, last, is_bot) = match &message.from {
        Some(user) => (
            user.username
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| user.first_name.clone()),
            user.id.to_string(),
            user.first_name.clone(),
            user.last_name.clone().unwrap_or_default(),
            user.is_bot,
        ),
        None => ("N/A".to_string(), "N/A".to_string(), "N/A".to_string(), String::new(), false),
    };
    let display = if display.is_empty() { "N/A".to_string() } else { display };
    let first = if first.is_empty() { "N/A".to_string() } else { first };
    format!(
        "User: {} (ID: {}), Name: {} {}, Is Bot: {}, Chat ID: {}, Chat Type: {}",
        display, id, first, last, is_bot, message.chat.id, message.chat.kind
    )
}

/// Unwraps the Bot API envelope; `ok: false` becomes an error carrying Telegram's description.
fn decode_response<T: DeserializeOwned>(method: &str, body: &str) -> Result<T> {
    let parsed: ApiResponse<T> = serde_json::from_str(body)
        .with_context(|| format!("unexpected Telegram {} response", method))?;
    if !parsed.ok {
        return Err(anyhow!(
            "Telegram {} rejected: {}",
            method,
            parsed.description.unwrap_or_else(|| "no description".to_string())
        ));
    }
    parsed
        .result
        .ok_or_else(|| anyhow!("Telegram {} returned no result", method))
}

/// Thin Bot API client. Errors never carry request URLs since they embed the token.
pub struct TelegramApi {
    http: HttpClient,
    api_base: String,
    token: String,
}

impl TelegramApi {
    pub fn new(token: impl Into<String>, poll_timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(poll_timeout + Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client for Telegram")?;
        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    pub fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_base, self.token, file_path)
    }

    fn call<T: DeserializeOwned>(&self, method: &str, body: &impl Serialize) -> Result<T> {
        let response = self
            .http
            .post(self.method_url(method))
            .json(body)
            .send()
            .map_err(|e| e.without_url())
            .with_context(|| format!("Telegram {} request failed", method))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| e.without_url())
            .with_context(|| format!("unreadable Telegram {} response ({})", method, status))?;
        decode_response(method, &body)
    }

    pub fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout.as_secs(),
                "allowed_updates": ["message"],
            }),
        )
    }

    pub fn get_file(&self, file_id: &str) -> Result<TelegramFile> {
        self.call("getFile", &json!({ "file_id": file_id }))
    }

    pub fn send_message(&self, chat_id: i64, text: &str, parse_mode: Option<&str>) -> Result<()> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if let Some(mode) = parse_mode {
            body["parse_mode"] = json!(mode);
        }
        let _: serde_json::Value = self.call("sendMessage", &body)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TelegramBotConfig {
    pub poll_timeout: Duration,
    pub retry_pause: Duration,
}

impl Default for TelegramBotConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_secs(30),
            retry_pause: Duration::from_secs(5),
        }
    }
}

pub struct TelegramBot<C: AnalysisClient> {
    api: TelegramApi,
    pipeline: FactCheckPipeline<C>,
    config: TelegramBotConfig,
}

impl<C: AnalysisClient> TelegramBot<C> {
    pub fn new(api: TelegramApi, pipeline: FactCheckPipeline<C>, config: TelegramBotConfig) -> Self {
        Self {
            api,
            pipeline,
            config,
        }
    }

    /// Long-polls forever. Failures are per update and never stop the loop.
    pub fn run(&self) -> Result<()> {
        info!("telegram bot polling started");
        let mut offset = 0_i64;
        loop {
            let updates = match self.api.get_updates(offset, self.config.poll_timeout) {
                Ok(updates) => updates,
                Err(err) => {
                    warn!(error = %format!("{err:#}"), "getUpdates failed, retrying");
                    sleep(self.config.retry_pause);
                    continue;
                }
            };
            for update in updates {
                offset = offset.max(update.update_id + 1);
                self.handle_update(&update);
            }
        }
    }

    pub fn handle_update(&self, update: &Update) {
        let Some(message) = &update.message else {
            return;
        };
        if let Err(err) = self.handle_message(message) {
            error!(update_id = update.update_id, error = %format!("{err:#}"), "error handling message");
        }
    }

    fn handle_message(&self, message: &Message) -> Result<()> {
        let sent_at = DateTime::<Utc>::from_timestamp(message.date, 0);
        info!(sender = %describe_sender(message), sent_at = ?sent_at, "message received");

        let reply = match classify(message) {
            Inbound::Start => GREETING_MESSAGE.to_string(),
            Inbound::Text(text) => {
                info!(text = %text, "received text");
                self.pipeline.reply_for(text, None)
            }
            Inbound::Photo { photo, caption } => {
                info!(file_id = %photo.file_id, width = photo.width, height = photo.height, "received image");
                match self.resolve_photo(photo) {
                    Ok(url) => self.pipeline.reply_for(caption, Some(&url)),
                    Err(err) => {
                        error!(error = %format!("{err:#}"), "could not resolve photo");
                        PROCESSING_ERROR_MESSAGE.to_string()
                    }
                }
            }
            Inbound::Unsupported => UNSUPPORTED_MESSAGE.to_string(),
        };

        self.reply(message.chat.id, &reply)
    }

    fn resolve_photo(&self, photo: &PhotoSize) -> Result<String> {
        let file = self.api.get_file(&photo.file_id)?;
        let path = file
            .file_path
            .ok_or_else(|| anyhow!("no file_path for {}", file.file_id))?;
        Ok(self.api.file_url(&path))
    }

    /// Markdown keeps source links clickable; text Telegram cannot parse as
    /// Markdown is re-sent plain.
    fn reply(&self, chat_id: i64, text: &str) -> Result<()> {
        if let Err(err) = self.api.send_message(chat_id, text, Some("Markdown")) {
            warn!(chat_id, error = %format!("{err:#}"), "markdown reply rejected, sending plain text");
            self.api.send_message(chat_id, text, None)?;
        }
        Ok(())
    }
}
