//! libSQL store — async `MessageStore` implementation.
//!
//! Supports local file and in-memory databases. Timestamps are stored
//! as unix seconds, label sets as JSON arrays.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::pipeline::types::MessageRecord;
use crate::store::migrations;
use crate::store::traits::MessageStore;

/// libSQL message store.
///
/// Holds a single connection reused for all operations;
/// `libsql::Connection` is `Send + Sync` and safe for concurrent
/// async use.
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Connection(format!("Failed to open database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Connection(format!("Failed to create connection: {e}")))?;

        migrations::run_migrations(&conn).await?;
        info!(path = %path.display(), "Database opened");
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Connection(format!("Failed to create connection: {e}")))?;

        migrations::run_migrations(&conn).await?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Map a row to a `MessageRecord`.
///
/// Column order: 0:message_id, 1:thread_id, 2:from_email, 3:subject,
/// 4:date_received, 5:labels, 6:message.
fn row_to_record(row: &libsql::Row) -> Result<MessageRecord, libsql::Error> {
    let message_id: String = row.get(0)?;
    let thread_id: String = row.get(1)?;
    let from_email: String = row.get(2)?;
    let subject: Option<String> = row.get(3).ok();
    let ts: i64 = row.get(4)?;
    let labels_json: String = row.get(5)?;
    let body: String = row.get(6)?;

    Ok(MessageRecord {
        message_id,
        thread_id,
        from_email,
        subject,
        body,
        date_received: DateTime::from_timestamp(ts, 0).unwrap_or(DateTime::<Utc>::MIN_UTC),
        labels: serde_json::from_str(&labels_json).unwrap_or_default(),
    })
}

/// Convert an optional string to a libsql Value (NULL when absent).
fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

fn labels_json(labels: &[String]) -> Result<String, DatabaseError> {
    serde_json::to_string(labels).map_err(|e| DatabaseError::Serialization(e.to_string()))
}

const MESSAGE_COLUMNS: &str =
    "message_id, thread_id, from_email, subject, date_received, labels, message";

#[async_trait]
impl MessageStore for LibSqlStore {
    async fn upsert_message(&self, msg: &MessageRecord) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO emails (message_id, thread_id, from_email, subject,
                    date_received, labels, message)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(message_id) DO UPDATE SET labels = excluded.labels",
                params![
                    msg.message_id.as_str(),
                    msg.thread_id.as_str(),
                    msg.from_email.as_str(),
                    opt_text(msg.subject.as_deref()),
                    msg.date_received.timestamp(),
                    labels_json(&msg.labels)?,
                    msg.body.as_str(),
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("upsert_message: {e}")))?;

        debug!(message_id = %msg.message_id, "Message upserted");
        Ok(())
    }

    async fn update_labels(
        &self,
        message_id: &str,
        labels: &[String],
    ) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "UPDATE emails SET labels = ?1 WHERE message_id = ?2",
                params![labels_json(labels)?, message_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("update_labels: {e}")))?;
        Ok(())
    }

    async fn get_all_messages(&self) -> Result<Vec<MessageRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {MESSAGE_COLUMNS} FROM emails ORDER BY date_received ASC"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_all_messages: {e}")))?;

        let mut messages = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("get_all_messages: {e}")))?
        {
            messages.push(
                row_to_record(&row)
                    .map_err(|e| DatabaseError::Query(format!("get_all_messages: {e}")))?,
            );
        }
        Ok(messages)
    }

    async fn get_messages_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<MessageRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {MESSAGE_COLUMNS} FROM emails
                     WHERE date_received >= ?1 ORDER BY date_received ASC"
                ),
                params![cutoff.timestamp()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_messages_since: {e}")))?;

        let mut messages = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("get_messages_since: {e}")))?
        {
            messages.push(
                row_to_record(&row)
                    .map_err(|e| DatabaseError::Query(format!("get_messages_since: {e}")))?,
            );
        }
        Ok(messages)
    }
}
