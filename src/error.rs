//! Error types for mailsift.

/// Top-level error type for the processor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),
}

/// Configuration-related errors — environment variables and rule
/// definitions. Any of these is fatal at startup: no partial rule set
/// is ever used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rules file is not a JSON list of rules: {0}")]
    Parse(String),

    #[error("Rule {rule} is missing required field `{field}`")]
    MissingField { rule: String, field: &'static str },

    #[error("Rule {rule}: unknown mode {mode:?}, expected \"all\" or \"any\"")]
    InvalidMode { rule: String, mode: String },

    #[error("Rule {rule} has no conditions")]
    NoConditions { rule: String },

    #[error("Rule {rule}: unknown condition field {field:?}")]
    UnknownField { rule: String, field: String },

    #[error("Rule {rule}: predicate {predicate:?} is not valid for field {field:?}")]
    InvalidPredicate {
        rule: String,
        field: String,
        predicate: String,
    },

    #[error("Rule {rule}: date condition value {value} must be a non-negative whole number of days")]
    InvalidDays { rule: String, value: String },

    #[error("Rule {rule}: unknown action type {action:?}")]
    UnknownAction { rule: String, action: String },

    #[error("Rule {rule}: move_message action requires a mailbox")]
    MissingMailbox { rule: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors from listing or fetching messages from the mail provider.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Mail API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),
}

/// A remote label mutation failed. Reported per message/action pair;
/// never aborts processing of other messages.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Mail API returned {status} modifying message {message_id}: {body}")]
    Api {
        status: u16,
        message_id: String,
        body: String,
    },
}

/// Result type alias for the processor.
pub type Result<T> = std::result::Result<T, Error>;
