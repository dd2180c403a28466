//! Gmail REST client — message fetching and label mutation.
//!
//! Covers the two provider calls the pipeline needs:
//! 1. `fetch_messages(since)` — list + get, paginated, newest window only
//! 2. `modify_labels()` — the single mutation primitive behind every
//!    rule action (read state and mailbox placement are both labels)
//!
//! Authentication is a bearer token handed in via config; OAuth flows
//! and token refresh live outside this process.

use std::collections::VecDeque;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::GmailConfig;
use crate::error::{FetchError, MutationError};
use crate::pipeline::types::MessageRecord;

/// The mutation seam the rule processor applies actions through.
#[async_trait]
pub trait MailMutator: Send + Sync {
    /// Add and remove labels on one message in a single call.
    async fn modify_labels(
        &self,
        message_id: &str,
        add: &[String],
        remove: &[String],
    ) -> Result<(), MutationError>;
}

/// Gmail API client over reqwest.
pub struct GmailClient {
    http: reqwest::Client,
    config: GmailConfig,
}

// ── Wire shapes ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    id: String,
    #[serde(rename = "threadId", default)]
    thread_id: String,
    #[serde(rename = "labelIds", default)]
    label_ids: Vec<String>,
    payload: Option<MessagePart>,
}

#[derive(Debug, Deserialize)]
struct MessagePart {
    #[serde(default)]
    headers: Vec<Header>,
    body: Option<PartBody>,
    #[serde(default)]
    parts: Vec<MessagePart>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct PartBody {
    data: Option<String>,
}

impl GmailClient {
    pub fn new(config: GmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(self.config.access_token.expose_secret())
    }

    /// Fetch every message received after `since`.
    ///
    /// Lists message ids page by page, then fetches each message in
    /// full. Unparseable dates fall back to the current time with a
    /// warning rather than dropping the message.
    pub async fn fetch_messages(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<MessageRecord>, FetchError> {
        let query = format!("after:{}", since.timestamp());
        let list_url = format!("{}/users/me/messages", self.config.base_url);

        let mut refs: Vec<MessageRef> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self.http.get(&list_url).query(&[("q", query.as_str())]);
            if let Some(ref token) = page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }

            let resp = self
                .auth(req)
                .send()
                .await
                .map_err(|e| FetchError::Http(e.to_string()))?;
            let resp = check_fetch_status(resp).await?;
            let list: ListResponse = resp
                .json()
                .await
                .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

            debug!(batch = list.messages.len(), "Listed message ids");
            refs.extend(list.messages);

            match list.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!(count = refs.len(), "Fetching message details");

        let mut messages = Vec::with_capacity(refs.len());
        for r in &refs {
            messages.push(self.get_message(&r.id).await?);
        }
        Ok(messages)
    }

    /// Fetch one message in full and materialize it as a record.
    async fn get_message(&self, id: &str) -> Result<MessageRecord, FetchError> {
        let url = format!("{}/users/me/messages/{id}", self.config.base_url);
        let resp = self
            .auth(self.http.get(&url).query(&[("format", "full")]))
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;
        let resp = check_fetch_status(resp).await?;
        let raw: RawMessage = resp
            .json()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

        Ok(materialize(raw))
    }
}

#[async_trait]
impl MailMutator for GmailClient {
    async fn modify_labels(
        &self,
        message_id: &str,
        add: &[String],
        remove: &[String],
    ) -> Result<(), MutationError> {
        let url = format!(
            "{}/users/me/messages/{message_id}/modify",
            self.config.base_url
        );
        let body = serde_json::json!({
            "addLabelIds": add,
            "removeLabelIds": remove,
        });

        let resp = self
            .auth(self.http.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| MutationError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MutationError::Api {
                status: status.as_u16(),
                message_id: message_id.to_string(),
                body,
            });
        }

        info!(message_id, ?add, ?remove, "Modified message labels");
        Ok(())
    }
}

async fn check_fetch_status(resp: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(FetchError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

/// Build a `MessageRecord` out of a raw API message.
fn materialize(raw: RawMessage) -> MessageRecord {
    let (from_email, subject, date_header) = match &raw.payload {
        Some(payload) => (
            header_value(payload, "from").unwrap_or_default(),
            header_value(payload, "subject"),
            header_value(payload, "date"),
        ),
        None => {
            warn!(id = %raw.id, "Message has no payload, headers unavailable");
            (String::new(), None, None)
        }
    };

    let date_received = date_header
        .as_deref()
        .and_then(parse_date_header)
        .unwrap_or_else(|| {
            warn!(id = %raw.id, date = ?date_header, "Unparseable date header, using current time");
            Utc::now()
        });

    let body = raw.payload.as_ref().map(extract_body).unwrap_or_default();

    MessageRecord {
        message_id: raw.id,
        thread_id: raw.thread_id,
        from_email,
        subject,
        body,
        date_received,
        labels: raw.label_ids,
    }
}

/// Case-insensitive header lookup.
fn header_value(payload: &MessagePart, name: &str) -> Option<String> {
    payload
        .headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.clone())
}

/// Parse a `Date` header value.
///
/// Trailing zone comments like "(UTC)" are stripped first. RFC 2822 is
/// the common case; some senders omit the weekday.
fn parse_date_header(raw: &str) -> Option<DateTime<Utc>> {
    let cleaned = raw.split(" (").next().unwrap_or(raw).trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(cleaned) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(cleaned, "%d %b %Y %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }
    None
}

/// Concatenate the decoded text of every MIME part, breadth-first.
fn extract_body(payload: &MessagePart) -> String {
    let mut queue: VecDeque<&MessagePart> = VecDeque::new();
    queue.push_back(payload);
    let mut body = String::new();

    while let Some(part) = queue.pop_front() {
        if let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref()) {
            // Gmail emits unpadded urlsafe base64; tolerate padding anyway
            match URL_SAFE_NO_PAD.decode(data.trim_end_matches('=')) {
                Ok(bytes) => body.push_str(&String::from_utf8_lossy(&bytes)),
                Err(e) => debug!("Failed to decode message body part: {e}"),
            }
        }
        queue.extend(part.parts.iter());
    }

    body
}
