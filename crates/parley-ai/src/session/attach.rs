//! Attachment analysis.
//!
//! Each attachment is a one-shot request of `[system, user]`; neither the
//! outgoing turn nor the reply enters the transcript, so later chat turns
//! do not see earlier attachment exchanges.

use tracing::{debug, warn};

use crate::attachment::{Attachment, AttachmentKind};
use crate::{Role, Turn};

use super::manager::{lock, Session};
use super::notices;
use super::types::{BusyGuard, PendingIndicator, SubmitOutcome, ATTACHMENT_MAX_TOKENS};

impl Session {
    /// Analyse one attachment and render the reply.
    pub async fn submit_attachment(&self, attachment: &Attachment) -> SubmitOutcome {
        let Ok(_guard) = BusyGuard::acquire(&self.busy) else {
            debug!("attachment dropped, request already in flight");
            return SubmitOutcome::Busy;
        };

        let settings = self.settings();
        if !settings.has_api_key() {
            self.notify(notices::ATTACH_NEEDS_KEY);
            return SubmitOutcome::NeedsConfig;
        }

        self.show(&Turn::user(notices::analyzing_file(&attachment.file_name)));

        let Ok(kind) = attachment.kind() else {
            debug!(media_type = %attachment.media_type, "unsupported attachment");
            self.notify(&notices::unsupported_file(&attachment.media_type));
            return SubmitOutcome::Unsupported;
        };

        let content = match attachment.to_content() {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, file = %attachment.file_name, "error processing file");
                self.notify(notices::FILE_FAILED);
                return SubmitOutcome::Failed;
            }
        };

        let request = vec![
            Turn::system(settings.system_prompt.as_str()),
            Turn::new(Role::User, content),
        ];

        let pending = PendingIndicator::show(self.surface.as_ref());
        let result = self
            .client
            .send_message(&settings.api_key, &request, ATTACHMENT_MAX_TOKENS)
            .await;
        drop(pending);

        match result {
            Ok(response) => {
                lock(&self.tracker).record(&response.model, &response.usage);
                self.show(&Turn::assistant(response.content.as_str()));
                SubmitOutcome::Answered(response.content)
            }
            Err(e) => {
                warn!(error = %e, file = %attachment.file_name, "attachment analysis failed");
                self.notify(match kind {
                    AttachmentKind::Image => notices::IMAGE_FAILED,
                    AttachmentKind::Text => notices::TEXT_FAILED,
                });
                SubmitOutcome::Failed
            }
        }
    }

    /// Analyse several attachments one after another, in order.
    pub async fn submit_attachments(&self, attachments: &[Attachment]) -> Vec<SubmitOutcome> {
        if attachments.is_empty() {
            return Vec::new();
        }
        if !self.settings().has_api_key() {
            self.notify(notices::ATTACH_NEEDS_KEY);
            return vec![SubmitOutcome::NeedsConfig];
        }

        let mut outcomes = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            outcomes.push(self.submit_attachment(attachment).await);
        }
        outcomes
    }
}
