//! ConversationController — applies inbound events to the session store and
//! turns transition effects into outbound messages.

use std::sync::Arc;

use chrono::NaiveDate;

use super::dispatch::Dispatcher;
use super::state::Step;
use super::store::SessionStore;
use super::transition::{Effect, TransitionResult, Trigger, transition};
use crate::channels::{InboundEvent, OutgoingMessage};
use crate::report::render_report;

/// Source of "today" for the date step.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Drives the report conversation for every user.
pub struct ConversationController {
    store: Arc<SessionStore>,
    dispatcher: Dispatcher,
    clock: Clock,
}

impl ConversationController {
    /// Create a controller using the local calendar date for "today".
    pub fn new(store: Arc<SessionStore>, dispatcher: Dispatcher) -> Self {
        Self {
            store,
            dispatcher,
            clock: Arc::new(|| chrono::Local::now().date_naive()),
        }
    }

    /// Replace the date source.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Handle one inbound event and return the messages to send, in order.
    ///
    /// Never fails: bad input turns into a re-prompt.
    pub async fn handle(&self, event: &InboundEvent) -> Vec<OutgoingMessage> {
        let trigger = Trigger::from_event(event);
        let today = (self.clock)();

        let (from, to, effects) = self
            .store
            .update(event.user_id, |slot| {
                let from = slot.as_ref().map(|s| s.step).unwrap_or(Step::Idle);
                let result = transition(slot.take(), trigger, today);
                let to = result.step();
                let TransitionResult { session, effects } = result;
                *slot = session;
                (from, to, effects)
            })
            .await;

        if from != to {
            tracing::debug!(user_id = event.user_id, %from, %to, "Report step changed");
        }

        let mut outgoing = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                Effect::Reply { text, keyboard } => {
                    let message = OutgoingMessage::new(event.chat_id, text);
                    outgoing.push(message.with_keyboard(keyboard));
                }
                Effect::Dispatch { report } => {
                    debug_assert!(report.is_complete());
                    let document = render_report(&report);
                    outgoing.extend(self.dispatcher.dispatch(event.user_id, &document));
                }
            }
        }
        outgoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::prompts::{ASK_DATE, BAD_DATE, REPORT_READY};

    fn controller(manager: Option<i64>) -> ConversationController {
        ConversationController::new(SessionStore::new(), Dispatcher::new(manager))
            .with_clock(|| NaiveDate::from_ymd_opt(2025, 12, 8).unwrap())
    }

    async fn send(c: &ConversationController, user: i64, text: &str) -> Vec<OutgoingMessage> {
        c.handle(&InboundEvent::new(user, text)).await
    }

    #[tokio::test]
    async fn prompts_go_to_originating_chat() {
        let c = controller(None);
        let event = InboundEvent::new(5, "Send report").with_chat_id(99);
        let out = c.handle(&event).await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipient, 99);
        assert_eq!(out[0].text, ASK_DATE);
    }

    #[tokio::test]
    async fn bad_date_keeps_step() {
        let c = controller(None);
        send(&c, 1, "Send report").await;
        let out = send(&c, 1, "8/12/2025").await;
        assert_eq!(out[0].text, BAD_DATE);
        assert_eq!(c.store().step(1).await, Step::AwaitingDate);
    }

    #[tokio::test]
    async fn completion_clears_session_and_copies_manager() {
        let c = controller(Some(-500));
        for text in ["Send report", "today", "a", "b", "c", "d", "e"] {
            send(&c, 3, text).await;
        }
        assert_eq!(c.store().step(3).await, Step::AwaitingExtra);

        let out = send(&c, 3, "f").await;
        assert!(c.store().get(3).await.is_none());
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].text, REPORT_READY);
        assert!(out[1].text.contains("Date: <b>08.12.2025</b>"));
        assert_eq!(out[2].recipient, -500);
        assert_eq!(out[1].text, out[2].text);
    }

    #[tokio::test]
    async fn users_progress_independently() {
        let c = controller(None);
        send(&c, 1, "Send report").await;
        send(&c, 2, "Send report").await;
        send(&c, 1, "today").await;
        assert_eq!(c.store().step(1).await, Step::AwaitingVitrina);
        assert_eq!(c.store().step(2).await, Step::AwaitingDate);
    }
}
