//! Core pipeline types — message records and processing outcomes.

use chrono::{DateTime, Utc};

use crate::error::MutationError;
use crate::pipeline::rules::Action;

/// Gmail's read state is the presence of this label.
pub const UNREAD_LABEL: &str = "UNREAD";

/// A materialized mail message as the engine sees it.
///
/// Read-only to the matcher; the applier works on a copy of `labels`
/// and never mutates the record itself.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    /// Provider-side stable identifier.
    pub message_id: String,
    /// Conversation thread the message belongs to.
    pub thread_id: String,
    /// Sender address (raw `From` header value).
    pub from_email: String,
    /// Subject line, absent for subjectless messages.
    pub subject: Option<String>,
    /// Plain-text body content.
    pub body: String,
    /// When the message was received.
    pub date_received: DateTime<Utc>,
    /// Current provider-side labels (mailbox placement + state flags).
    pub labels: Vec<String>,
}

impl MessageRecord {
    /// Whether the message currently carries the given label.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Whether the message is unread.
    pub fn is_unread(&self) -> bool {
        self.has_label(UNREAD_LABEL)
    }
}

/// How action application ended for one message.
#[derive(Debug)]
pub enum ApplyOutcome {
    /// Every action was applied or was already in effect.
    Applied,
    /// Some mutations succeeded before one failed; the remaining
    /// actions for this message were not attempted.
    Partial { applied: usize, error: MutationError },
    /// The first mutation failed; nothing was changed remotely.
    Failed(MutationError),
}

impl ApplyOutcome {
    /// True when all actions went through.
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied)
    }
}

/// Result of running one message through the pipeline: the actions the
/// rule set produced (empty when no rule matched) and how applying
/// them went.
#[derive(Debug)]
pub struct ProcessedMessage {
    pub message_id: String,
    pub actions: Vec<Action>,
    pub outcome: ApplyOutcome,
}
