//! Telegram channel — long-polls the Bot API for updates.
//!
//! Native Rust Telegram Bot API implementation: `getUpdates` for inbound
//! text, `sendMessage` with HTML parse mode and reply keyboards for outbound.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::channels::{Channel, InboundEvent, Keyboard, MessageStream, OutgoingMessage};
use crate::error::ChannelError;

/// Maximum message length for Telegram's sendMessage API.
const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

/// Extra time on top of the long-poll timeout before the HTTP call is abandoned.
const HTTP_GRACE: Duration = Duration::from_secs(10);

/// Pause after a failed poll before trying again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Telegram channel — connects to the Bot API via long-polling.
pub struct TelegramChannel {
    bot_token: String,
    poll_timeout: Duration,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: String, poll_timeout: Duration) -> Self {
        Self {
            bot_token,
            poll_timeout,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        api_url(&self.bot_token, method)
    }

    /// Send a text message, splitting it if it exceeds Telegram's 4096 char
    /// limit. The keyboard is attached to the last chunk.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), ChannelError> {
        let chunks = split_message(text, TELEGRAM_MAX_MESSAGE_LENGTH);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.iter().enumerate() {
            let markup = if i == last { reply_markup(keyboard) } else { None };
            self.send_message_chunk(chat_id, chunk, markup.as_ref()).await?;
        }
        Ok(())
    }

    /// Send a single message chunk (≤4096 chars), HTML first with plain-text fallback.
    async fn send_message_chunk(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&Value>,
    ) -> Result<(), ChannelError> {
        let mut html_body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML"
        });
        if let Some(markup) = markup {
            html_body["reply_markup"] = markup.clone();
        }

        let html_resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&html_body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if html_resp.status().is_success() {
            return Ok(());
        }

        let html_status = html_resp.status();
        let html_err = html_resp.text().await.unwrap_or_default();
        tracing::warn!(
            status = ?html_status,
            chat_id,
            error = %html_err,
            "Telegram sendMessage with HTML failed; retrying without parse_mode"
        );

        // Retry without parse_mode
        let mut plain_body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(markup) = markup {
            plain_body["reply_markup"] = markup.clone();
        }
        let plain_resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&plain_body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if !plain_resp.status().is_success() {
            let plain_err = plain_resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed {
                name: "telegram".into(),
                reason: format!(
                    "sendMessage failed (html: {}, plain: {})",
                    html_status, plain_err
                ),
            });
        }

        Ok(())
    }
}

// ── Channel trait implementation ────────────────────────────────────

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let url = self.api_url("getUpdates");
        let poll_timeout = self.poll_timeout;
        let client = self.client.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;

            tracing::info!("Telegram channel listening for messages...");

            loop {
                let body = json!({
                    "offset": offset,
                    "timeout": poll_timeout.as_secs(),
                    "allowed_updates": ["message"]
                });

                let resp = match client
                    .post(&url)
                    .timeout(poll_timeout + HTTP_GRACE)
                    .json(&body)
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("Telegram poll error: {e}");
                        tokio::time::sleep(RETRY_DELAY).await;
                        continue;
                    }
                };

                let data: Value = match resp.json().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!("Telegram parse error: {e}");
                        tokio::time::sleep(RETRY_DELAY).await;
                        continue;
                    }
                };

                if data.get("ok").and_then(Value::as_bool) != Some(true) {
                    let description = data
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or("no description");
                    tracing::warn!("Telegram getUpdates rejected: {description}");
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }

                let Some(results) = data.get("result").and_then(Value::as_array) else {
                    continue;
                };

                for update in results {
                    // Advance offset past this update
                    if let Some(uid) = update.get("update_id").and_then(Value::as_i64) {
                        offset = uid + 1;
                    }

                    let Some(event) = parse_update(update) else {
                        continue;
                    };

                    if tx.send(event).is_err() {
                        tracing::info!("Telegram listener channel closed");
                        return;
                    }
                }
            }
        });

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), ChannelError> {
        self.send_message(message.recipient, &message.text, &message.keyboard)
            .await
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: format!("getMe returned {}", resp.status()),
            })
        }
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        tracing::info!("Telegram channel shutting down");
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn api_url(bot_token: &str, method: &str) -> String {
    format!("https://api.telegram.org/bot{bot_token}/{method}")
}

/// Turn a `message` update into an inbound event. Non-text updates yield `None`.
fn parse_update(update: &Value) -> Option<InboundEvent> {
    let message = update.get("message")?;
    let text = message.get("text").and_then(Value::as_str)?;

    let from = message.get("from");
    let Some(user_id) = from.and_then(|f| f.get("id")).and_then(Value::as_i64) else {
        tracing::debug!("Telegram: skipping message without sender id");
        return None;
    };

    let chat_id = message
        .get("chat")
        .and_then(|c| c.get("id"))
        .and_then(Value::as_i64)
        .unwrap_or(user_id);

    let mut event = InboundEvent::new(user_id, text).with_chat_id(chat_id);

    let name = from
        .and_then(|f| f.get("first_name").or_else(|| f.get("username")))
        .and_then(Value::as_str);
    if let Some(name) = name {
        event = event.with_user_name(name);
    }

    Some(event)
}

/// Build the `reply_markup` object for a keyboard, if any.
fn reply_markup(keyboard: &Keyboard) -> Option<Value> {
    match keyboard {
        Keyboard::None => None,
        Keyboard::Reply { buttons, one_time } => {
            let row: Vec<Value> = buttons.iter().map(|b| json!({ "text": b })).collect();
            Some(json!({
                "keyboard": [row],
                "resize_keyboard": true,
                "one_time_keyboard": one_time,
            }))
        }
        Keyboard::Remove => Some(json!({ "remove_keyboard": true })),
    }
}

/// Split a message into chunks that fit Telegram's character limit.
/// Tries to split on newlines, then spaces, then hard-cuts on a char boundary.
/// A cut never lands inside an HTML entity, a tag, or a `<b>` element, so
/// every chunk still parses in HTML mode.
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            chunks.push(remaining.to_string());
            break;
        }

        let mut limit = max_len;
        while !remaining.is_char_boundary(limit) {
            limit -= 1;
        }

        let split_at = split_point(&remaining[..limit]);

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
    }

    chunks
}

/// Best place to cut `chunk`: the last newline, else the last space, else
/// the last char boundary, counting only positions outside HTML markup.
/// Falls back to the full length when the chunk has no such position.
fn split_point(chunk: &str) -> usize {
    let mut newline = None;
    let mut space = None;
    let mut boundary = None;

    let mut in_entity = false;
    let mut in_tag = false;
    let mut open_elements = 0usize;

    for (i, c) in chunk.char_indices() {
        // Never cut at position 0 (infinite loop guard)
        if i > 0 && !in_entity && !in_tag && open_elements == 0 {
            boundary = Some(i);
            match c {
                '\n' => newline = Some(i),
                ' ' => space = Some(i),
                _ => {}
            }
        }

        match c {
            '&' if !in_tag => in_entity = true,
            ';' if in_entity => in_entity = false,
            '<' => {
                in_tag = true;
                if chunk[i..].starts_with("</") {
                    open_elements = open_elements.saturating_sub(1);
                } else {
                    open_elements += 1;
                }
            }
            '>' if in_tag => in_tag = false,
            _ => {}
        }
    }

    if !in_entity && !in_tag && open_elements == 0 {
        boundary = Some(chunk.len());
    }

    newline.or(space).or(boundary).unwrap_or(chunk.len())
}

// ── Tests ───────────────────────────────────────────────────────────
