//! Text submissions: plain chat and search.

use tracing::{debug, warn};

use crate::Turn;

use super::manager::{lock, Session};
use super::notices;
use super::types::{BusyGuard, PendingIndicator, SubmitOutcome, CHAT_MAX_TOKENS};

impl Session {
    /// Submit user text and render the assistant's reply.
    ///
    /// On success the transcript grows by the user turn and the reply. On
    /// a failed remote call only the user turn is kept; the failure is
    /// shown as a notice the model never sees.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let Ok(_guard) = BusyGuard::acquire(&self.busy) else {
            debug!("submission dropped, request already in flight");
            return SubmitOutcome::Busy;
        };

        let settings = self.settings();
        if !settings.has_api_key() {
            self.notify(notices::CHAT_NEEDS_KEY);
            return SubmitOutcome::NeedsConfig;
        }

        let user = Turn::user(text);
        let request = {
            let mut transcript = lock(&self.transcript);
            transcript.push(user.clone());

            let mut request = Vec::with_capacity(transcript.len() + 1);
            request.push(Turn::system(settings.system_prompt.as_str()));
            request.extend(transcript.iter().cloned());
            request
        };
        self.show(&user);

        let pending = PendingIndicator::show(self.surface.as_ref());
        let result = self
            .client
            .send_message(&settings.api_key, &request, CHAT_MAX_TOKENS)
            .await;
        drop(pending);

        match result {
            Ok(response) => {
                lock(&self.tracker).record(&response.model, &response.usage);
                let reply = Turn::assistant(response.content.as_str());
                lock(&self.transcript).push(reply.clone());
                self.show(&reply);
                SubmitOutcome::Answered(response.content)
            }
            Err(e) => {
                warn!(error = %e, "error getting AI response");
                self.notify(notices::CHAT_FAILED);
                SubmitOutcome::Failed
            }
        }
    }

    /// Ask the model about `query` as an ordinary chat turn.
    pub async fn search(&self, query: &str) -> SubmitOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if !self.settings().has_api_key() {
            self.notify(notices::SEARCH_NEEDS_KEY);
            return SubmitOutcome::NeedsConfig;
        }
        self.submit(&notices::search_request(query)).await
    }
}
