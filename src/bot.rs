//! Bot runner — feeds channel events through the conversation controller.

use futures::StreamExt;

use crate::channels::{Channel, InboundEvent};
use crate::conversation::ConversationController;
use crate::error::Result;

/// Connects one channel to the conversation controller.
pub struct ReportBot<C: Channel> {
    channel: C,
    controller: ConversationController,
}

impl<C: Channel> ReportBot<C> {
    pub fn new(channel: C, controller: ConversationController) -> Self {
        Self {
            channel,
            controller,
        }
    }

    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    /// Run until the channel stream ends or Ctrl+C is pressed.
    pub async fn run(&self) -> Result<()> {
        let mut events = self.channel.start().await?;

        tracing::info!(channel = self.channel.name(), "Report bot ready and listening");

        loop {
            let event = tokio::select! {
                biased;
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received, shutting down...");
                    break;
                }
                event = events.next() => {
                    match event {
                        Some(e) => e,
                        None => {
                            tracing::info!("Channel stream ended, shutting down...");
                            break;
                        }
                    }
                }
            };

            self.handle_event(&event).await;
        }

        let unfinished = self.controller.store().len().await;
        if unfinished > 0 {
            tracing::info!(unfinished, "Dropping reports still in progress");
        }

        self.channel.shutdown().await?;
        Ok(())
    }

    /// Handle one event and deliver every resulting message in order.
    ///
    /// Returns how many messages were delivered. Failed sends are logged and
    /// skipped; the conversation state has already moved on.
    pub async fn handle_event(&self, event: &InboundEvent) -> usize {
        tracing::debug!(
            user_id = event.user_id,
            user = event.user_name.as_deref().unwrap_or("unknown"),
            kind = ?event.kind,
            "Inbound message"
        );

        let mut delivered = 0;
        for message in self.controller.handle(event).await {
            let recipient = message.recipient;
            match self.channel.send(message).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(recipient, "Failed to deliver message: {e}");
                }
            }
        }
        delivered
    }
}
