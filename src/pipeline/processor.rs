//! Action application — turns collected actions into label mutations.
//!
//! Actions apply sequentially against a working copy of the message's
//! label set, so a later action sees the labels as updated by earlier
//! ones and the net read-state/location is the last action of that
//! category. An action whose effect is already in place is skipped
//! without a remote call, which makes re-applying a resolved action
//! list a no-op.
//!
//! A mutation failure stops the remaining actions for that message
//! only; the rest of the batch keeps processing. Retry policy belongs
//! to the caller.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::gmail::MailMutator;
use crate::pipeline::rules::{Action, RuleSet};
use crate::pipeline::types::{ApplyOutcome, MessageRecord, ProcessedMessage, UNREAD_LABEL};
use crate::store::MessageStore;

/// Evaluates the rule set over a batch of messages and applies the
/// resulting actions via the mutation interface, recording label state
/// in the store.
pub struct RuleProcessor {
    rules: RuleSet,
    mutator: Arc<dyn MailMutator>,
    store: Arc<dyn MessageStore>,
}

/// The single label change one action intends, relative to the current
/// label set. `None` when the message is already in the desired state.
enum LabelDelta {
    Add(String),
    Remove(String),
}

fn action_delta(action: &Action, labels: &[String]) -> Option<LabelDelta> {
    let has = |l: &str| labels.iter().any(|x| x == l);
    match action {
        Action::MarkRead => has(UNREAD_LABEL).then(|| LabelDelta::Remove(UNREAD_LABEL.into())),
        Action::MarkUnread => (!has(UNREAD_LABEL)).then(|| LabelDelta::Add(UNREAD_LABEL.into())),
        Action::MoveMessage { mailbox } => {
            (!has(mailbox.as_str())).then(|| LabelDelta::Add(mailbox.clone()))
        }
    }
}

impl RuleProcessor {
    pub fn new(rules: RuleSet, mutator: Arc<dyn MailMutator>, store: Arc<dyn MessageStore>) -> Self {
        Self {
            rules,
            mutator,
            store,
        }
    }

    /// Run every message through the rule set and apply the collected
    /// actions. Returns one entry per input message, in order;
    /// non-matching messages appear with an empty action list.
    pub async fn process(
        &self,
        messages: &[MessageRecord],
        now: DateTime<Utc>,
    ) -> Vec<ProcessedMessage> {
        let mut results = Vec::with_capacity(messages.len());

        for msg in messages {
            let actions = self.rules.evaluate(msg, now);
            if actions.is_empty() {
                results.push(ProcessedMessage {
                    message_id: msg.message_id.clone(),
                    actions,
                    outcome: ApplyOutcome::Applied,
                });
                continue;
            }

            info!(
                message_id = %msg.message_id,
                actions = actions.len(),
                "Applying rule actions"
            );

            let (labels, outcome) = self.apply(msg, &actions).await;

            // Record the resulting label state locally, even after a
            // partial apply — the store mirrors what the remote side
            // actually did.
            if labels != msg.labels {
                if let Err(e) = self.store.update_labels(&msg.message_id, &labels).await {
                    warn!(message_id = %msg.message_id, error = %e, "Failed to persist label state");
                }
            }

            match &outcome {
                ApplyOutcome::Applied => {}
                ApplyOutcome::Partial { applied, error } => warn!(
                    message_id = %msg.message_id,
                    applied,
                    error = %error,
                    "Mutation failed after partial apply"
                ),
                ApplyOutcome::Failed(error) => warn!(
                    message_id = %msg.message_id,
                    error = %error,
                    "Mutation failed, no actions applied"
                ),
            }

            results.push(ProcessedMessage {
                message_id: msg.message_id.clone(),
                actions,
                outcome,
            });
        }

        results
    }

    /// Apply the actions in order. Returns the final local label set
    /// and the outcome.
    async fn apply(&self, msg: &MessageRecord, actions: &[Action]) -> (Vec<String>, ApplyOutcome) {
        let mut labels = msg.labels.clone();
        let mut applied = 0usize;

        for action in actions {
            let Some(delta) = action_delta(action, &labels) else {
                debug!(
                    message_id = %msg.message_id,
                    ?action,
                    "Skipping action, message already in desired state"
                );
                continue;
            };

            let (add, remove): (&[String], &[String]) = match &delta {
                LabelDelta::Add(l) => (std::slice::from_ref(l), &[]),
                LabelDelta::Remove(l) => (&[], std::slice::from_ref(l)),
            };

            match self.mutator.modify_labels(&msg.message_id, add, remove).await {
                Ok(()) => {
                    match delta {
                        LabelDelta::Add(l) => labels.push(l),
                        LabelDelta::Remove(l) => labels.retain(|x| *x != l),
                    }
                    applied += 1;
                }
                Err(error) => {
                    let outcome = if applied == 0 {
                        ApplyOutcome::Failed(error)
                    } else {
                        ApplyOutcome::Partial { applied, error }
                    };
                    return (labels, outcome);
                }
            }
        }

        (labels, ApplyOutcome::Applied)
    }
}
