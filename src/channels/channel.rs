//! Channel trait and the messages that flow through it.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ChannelError;

/// Stream of inbound events produced by a channel.
pub type MessageStream = Pin<Box<dyn Stream<Item = InboundEvent> + Send>>;

/// Whether an inbound text is a slash command or plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Command,
    Text,
}

impl EventKind {
    /// Classify raw message text.
    pub fn of(text: &str) -> Self {
        if text.trim_start().starts_with('/') {
            Self::Command
        } else {
            Self::Text
        }
    }
}

/// A text message received from a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Platform identity of the sender; sessions are keyed by this.
    pub user_id: i64,
    /// Chat the message came from; prompts are sent back here.
    pub chat_id: i64,
    /// Raw message text.
    pub text: String,
    /// Decides whether the text is parsed as a slash command.
    pub kind: EventKind,
    /// Display name, for logs only.
    pub user_name: Option<String>,
}

impl InboundEvent {
    /// Create an event from a private chat, where chat and user ids coincide.
    pub fn new(user_id: i64, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            user_id,
            chat_id: user_id,
            kind: EventKind::of(&text),
            text,
            user_name: None,
        }
    }

    pub fn with_chat_id(mut self, chat_id: i64) -> Self {
        self.chat_id = chat_id;
        self
    }

    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }
}

/// Keyboard attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Keyboard {
    /// Leave whatever keyboard the user currently has.
    #[default]
    None,
    /// Show quick-reply buttons, one row.
    Reply {
        buttons: Vec<String>,
        /// Hide the keyboard after a button is pressed.
        one_time: bool,
    },
    /// Hide the custom keyboard.
    Remove,
}

impl Keyboard {
    pub fn reply<I, S>(buttons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Reply {
            buttons: buttons.into_iter().map(Into::into).collect(),
            one_time: false,
        }
    }

    pub fn one_time<I, S>(buttons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Reply {
            buttons: buttons.into_iter().map(Into::into).collect(),
            one_time: true,
        }
    }
}

/// A message to deliver to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub recipient: i64,
    /// Body in Telegram HTML markup.
    pub text: String,
    pub keyboard: Keyboard,
}

impl OutgoingMessage {
    pub fn new(recipient: i64, text: impl Into<String>) -> Self {
        Self {
            recipient,
            text: text.into(),
            keyboard: Keyboard::None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = keyboard;
        self
    }
}

/// A chat transport the bot can listen on and send through.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Short channel name for logs.
    fn name(&self) -> &str;

    /// Begin receiving messages.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Deliver one message.
    async fn send(&self, message: OutgoingMessage) -> Result<(), ChannelError>;

    /// Verify the channel can reach its backend.
    async fn health_check(&self) -> Result<(), ChannelError>;

    /// Release resources before exit.
    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}
