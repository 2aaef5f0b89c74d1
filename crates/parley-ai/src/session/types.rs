//! Session settings, outcomes, and concurrency guards.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{AiError, Surface};

/// Output ceiling for plain chat requests.
pub const CHAT_MAX_TOKENS: u32 = 2000;
/// Output ceiling for attachment analysis requests.
pub const ATTACHMENT_MAX_TOKENS: u32 = 1000;

/// The two user-editable chat settings, read on every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub system_prompt: String,
}

impl Settings {
    /// Build settings, trimming both values.
    pub fn new(api_key: impl AsRef<str>, system_prompt: impl AsRef<str>) -> Self {
        Self {
            api_key: api_key.as_ref().trim().to_string(),
            system_prompt: system_prompt.as_ref().trim().to_string(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"[REDACTED]")
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// A request was already in flight; the submission was dropped.
    Busy,
    /// No API key; a guidance notice was shown.
    NeedsConfig,
    /// Attachment media type is not handled; a notice was shown.
    Unsupported,
    /// The remote call failed; a generic notice was shown.
    Failed,
    /// The model replied with this text.
    Answered(String),
}

/// Guard that clears the `busy` flag on drop, so the flag is released
/// even if the submission future is dropped or returns early.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to acquire the busy flag. Returns `Err` if already busy.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, AiError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(AiError::Busy);
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Shows the pending indicator for as long as it lives.
pub(crate) struct PendingIndicator<'a> {
    surface: &'a dyn Surface,
}

impl<'a> PendingIndicator<'a> {
    pub(crate) fn show(surface: &'a dyn Surface) -> Self {
        surface.pending_started();
        Self { surface }
    }
}

impl Drop for PendingIndicator<'_> {
    fn drop(&mut self) {
        self.surface.pending_finished();
    }
}
