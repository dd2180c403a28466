//! Mailsift — Gmail rule processor.
//!
//! Fetches a mailbox's messages, persists them locally, and runs a
//! user-configurable rule engine over them: declarative conditions on
//! sender/subject/body text and message age, mapped to label mutations
//! (mark read/unread, move to mailbox).

pub mod config;
pub mod error;
pub mod gmail;
pub mod pipeline;
pub mod store;
