//! Persistence layer — local mirror of fetched mail.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlStore;
pub use traits::MessageStore;
