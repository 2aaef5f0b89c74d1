//! Conversation orchestration.
//!
//! A `Session` owns the transcript, the chat settings, and the busy flag.
//! Each submission runs as one task: precondition checks, transcript
//! append, a single remote call, then render. At most one remote call is
//! in flight; submissions arriving while busy are dropped, not queued.

mod attach;
mod chat;
mod manager;
pub mod notices;
mod types;

#[cfg(test)]
mod tests;

pub use manager::Session;
pub use types::{Settings, SubmitOutcome, ATTACHMENT_MAX_TOKENS, CHAT_MAX_TOKENS};
