//! Report conversation — the per-user question sequence.
//!
//! A user starts a report, answers the date question and six free-text
//! questions in a fixed order, and the finished report is sent back to them
//! and, optionally, to a managers' chat. The state machine itself is a pure
//! function (`transition`); `ConversationController` applies it against the
//! shared `SessionStore`.

pub mod controller;
pub mod dispatch;
pub mod prompts;
pub mod state;
pub mod store;
pub mod transition;

pub use controller::ConversationController;
pub use dispatch::Dispatcher;
pub use state::{Session, Step};
pub use store::SessionStore;
pub use transition::{Effect, TransitionResult, Trigger, transition};
