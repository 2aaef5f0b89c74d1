//! Session struct, settings lifecycle, and transcript access.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{debug, info};

use crate::markup;
use crate::token_tracker::TokenTracker;
use crate::{AiClient, Surface, Turn};

use super::notices;
use super::types::{BusyGuard, Settings};

/// A conversation with one remote model, rendered to one surface.
pub struct Session {
    pub(super) client: Arc<dyn AiClient>,
    pub(super) surface: Arc<dyn Surface>,
    /// Chat settings; replaced only by `save_settings`.
    pub(super) settings: RwLock<Settings>,
    /// Append-only conversation history. Never held across an await.
    pub(super) transcript: Mutex<Vec<Turn>>,
    pub(super) tracker: Mutex<TokenTracker>,
    /// Whether a remote call is in flight.
    pub(super) busy: AtomicBool,
}

impl Session {
    pub fn new(client: Arc<dyn AiClient>, surface: Arc<dyn Surface>, settings: Settings) -> Self {
        Self {
            client,
            surface,
            settings: RwLock::new(settings),
            transcript: Mutex::new(Vec::new()),
            tracker: Mutex::new(TokenTracker::new()),
            busy: AtomicBool::new(false),
        }
    }

    /// Show the welcome notice when no API key is configured yet.
    pub fn greet(&self) {
        if !self.settings().has_api_key() {
            self.notify(notices::WELCOME);
        }
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the settings with trimmed values and confirm on the surface.
    ///
    /// Returns the stored settings so the caller can persist them.
    pub fn save_settings(&self, api_key: &str, system_prompt: &str) -> Settings {
        let settings = Settings::new(api_key, system_prompt);
        *self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = settings.clone();

        if settings.has_api_key() {
            info!("settings saved");
            self.notify(notices::SETTINGS_SAVED);
        } else {
            info!("settings saved without an API key");
            self.notify(notices::SETTINGS_NEED_KEY);
        }
        settings
    }

    /// Copy of the conversation history.
    pub fn transcript(&self) -> Vec<Turn> {
        lock(&self.transcript).clone()
    }

    /// Number of turns in the history.
    pub fn message_count(&self) -> usize {
        lock(&self.transcript).len()
    }

    /// Whether a remote call is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Snapshot of token usage so far.
    pub fn usage(&self) -> TokenTracker {
        lock(&self.tracker).clone()
    }

    /// Clear the conversation history. Refused while a request is in flight.
    pub fn reset(&self) -> bool {
        let Ok(_guard) = BusyGuard::acquire(&self.busy) else {
            debug!("reset refused, request in flight");
            return false;
        };
        let mut transcript = lock(&self.transcript);
        info!(turns = transcript.len(), "conversation reset");
        transcript.clear();
        true
    }

    /// Render a turn to the surface.
    pub(super) fn show(&self, turn: &Turn) {
        self.surface.show(turn.role, &markup::render(turn));
    }

    /// Render an assistant notice without recording it.
    pub(super) fn notify(&self, text: &str) {
        self.show(&Turn::assistant(text));
    }
}

pub(super) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
