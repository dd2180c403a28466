//! Async `MessageStore` trait — the persistence seam the pipeline
//! writes through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DatabaseError;
use crate::pipeline::types::MessageRecord;

/// Backend-agnostic message persistence.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a message, or refresh its labels if it already exists.
    ///
    /// Upsert-by-id policy: a new `message_id` stores the full record;
    /// an existing one updates only the labels column — everything
    /// else is immutable once stored.
    async fn upsert_message(&self, msg: &MessageRecord) -> Result<(), DatabaseError>;

    /// Replace the stored label set for one message.
    async fn update_labels(&self, message_id: &str, labels: &[String])
    -> Result<(), DatabaseError>;

    /// All stored messages, oldest first.
    async fn get_all_messages(&self) -> Result<Vec<MessageRecord>, DatabaseError>;

    /// Messages received at or after `cutoff`, oldest first.
    async fn get_messages_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<MessageRecord>, DatabaseError>;
}
