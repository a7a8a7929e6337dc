// src/telegram.rs
// Minimal blocking Telegram Bot API client: long-poll for commands,
// reply with messages and documents.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::cancel::CancelToken;
use crate::config::consts::{BOT_API_BASE, BOT_POLL_SECS, USER_AGENT};
use crate::error::TriggerError;
use crate::trigger::{Delivery, Trigger};

const RETRY_AFTER_ERROR: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Fetch,
}

impl Command {
    /// `/fetch`, `/fetch@SomeBot`, `/start extra words` … anything else is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let head = text.split_whitespace().next()?;
        let name = head.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "fetch" => Some(Command::Fetch),
            _ => None,
        }
    }
}

pub struct BotClient {
    client: Client,
    base: String,
}

impl BotClient {
    pub fn new(token: &str) -> Result<Self, reqwest::Error> {
        Self::with_base(BOT_API_BASE, token)
    }

    /// Client against a different API host (self-hosted Bot API server).
    pub fn with_base(api_base: &str, token: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            // must outlive the long-poll window
            .timeout(Duration::from_secs(BOT_POLL_SECS + 15))
            .build()?;
        let base = format!("{}/bot{}", api_base.trim_end_matches('/'), token);
        Ok(Self { client, base })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base)
    }

    fn unwrap_response<T: DeserializeOwned>(resp: reqwest::blocking::Response) -> Result<Option<T>, TriggerError> {
        let body: ApiResponse<T> = resp.json()?;
        if !body.ok {
            return Err(TriggerError::Api(body.description.unwrap_or_else(|| s!("unknown error"))));
        }
        Ok(body.result)
    }

    pub fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TriggerError> {
        let resp = self
            .client
            .get(self.url("getUpdates"))
            .query(&[("offset", offset.to_string()), ("timeout", BOT_POLL_SECS.to_string())])
            .send()?;
        Ok(Self::unwrap_response(resp)?.unwrap_or_default())
    }

    pub fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TriggerError> {
        let resp = self
            .client
            .post(self.url("sendMessage"))
            .form(&[("chat_id", chat_id.to_string()), ("text", s!(text))])
            .send()?;
        Self::unwrap_response::<serde_json::Value>(resp).map(|_| ())
    }

    pub fn send_document(&self, chat_id: i64, path: &Path, name: &str) -> Result<(), TriggerError> {
        let bytes = fs::read(path).map_err(|source| TriggerError::Attachment {
            path: path.to_path_buf(),
            source,
        })?;
        let form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", multipart::Part::bytes(bytes).file_name(s!(name)));
        let resp = self.client.post(self.url("sendDocument")).multipart(form).send()?;
        Self::unwrap_response::<serde_json::Value>(resp).map(|_| ())
    }
}

/// Replies into one chat.
pub struct ChatDelivery<'a> {
    bot: &'a BotClient,
    chat_id: i64,
}

impl<'a> ChatDelivery<'a> {
    pub fn new(bot: &'a BotClient, chat_id: i64) -> Self {
        Self { bot, chat_id }
    }
}

impl Delivery for ChatDelivery<'_> {
    fn message(&mut self, text: &str) -> Result<(), TriggerError> {
        self.bot.send_message(self.chat_id, text)
    }

    fn document(&mut self, path: &Path, name: &str) -> Result<(), TriggerError> {
        self.bot.send_document(self.chat_id, path, name)
    }
}

/// Poll for commands until `cancel` trips. Commands are handled one at a time.
pub fn serve(bot: &BotClient, trigger: &Trigger, cancel: &CancelToken) {
    logf!("Bot running. Send /fetch to fetch race cards.");
    let mut offset = 0i64;

    while !cancel.is_cancelled() {
        let updates = match bot.get_updates(offset) {
            Ok(u) => u,
            Err(e) => {
                loge!("Polling failed: {e}");
                thread::sleep(RETRY_AFTER_ERROR);
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(msg) = update.message else { continue };
            let Some(cmd) = msg.text.as_deref().and_then(Command::parse) else { continue };

            let user_id = msg.from.as_ref().map_or(msg.chat.id, |u| u.id);
            let mut reply = ChatDelivery::new(bot, msg.chat.id);
            logf!("{cmd:?} from user {user_id}");

            match cmd {
                Command::Start => {
                    if let Err(e) = trigger.handle_start(&mut reply) {
                        loge!("Could not reply to /start: {e}");
                    }
                }
                Command::Fetch => {
                    let outcome = trigger.handle_fetch(user_id, &mut reply);
                    logd!("Fetch outcome: {outcome:?}");
                }
            }
        }
    }
    logf!("Bot stopped.");
}
