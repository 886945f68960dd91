//! Report dispatch — who receives a finished report.

use super::prompts::{REPORT_READY, main_keyboard};
use crate::channels::OutgoingMessage;

/// Builds the outbound messages for a finished report.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    manager_chat_id: Option<i64>,
}

impl Dispatcher {
    /// `manager_chat_id` receives a copy of every report when set.
    pub fn new(manager_chat_id: Option<i64>) -> Self {
        Self { manager_chat_id }
    }

    /// Messages delivering `document` to its author and the manager chat.
    pub fn dispatch(&self, user_id: i64, document: &str) -> Vec<OutgoingMessage> {
        let mut messages = vec![
            OutgoingMessage::new(user_id, REPORT_READY),
            OutgoingMessage::new(user_id, document).with_keyboard(main_keyboard()),
        ];

        if let Some(manager) = self.manager_chat_id {
            messages.push(OutgoingMessage::new(manager, document));
        }

        tracing::info!(
            user_id,
            manager_copy = self.manager_chat_id.is_some(),
            "Report dispatched"
        );

        messages
    }
}
