//! Configuration types.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default Gmail REST endpoint.
pub const DEFAULT_GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

/// Processor configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the local message database.
    pub db_path: String,
    /// Path to the JSON rules file.
    pub rules_path: String,
    /// How many days of mail to fetch per run.
    pub look_back_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "./data/mailsift.db".to_string(),
            rules_path: "./config/rules.json".to_string(),
            look_back_days: 7,
        }
    }
}

impl AppConfig {
    /// Build the config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: std::env::var("MAILSIFT_DB_PATH").unwrap_or(defaults.db_path),
            rules_path: std::env::var("MAILSIFT_RULES_PATH").unwrap_or(defaults.rules_path),
            look_back_days: std::env::var("MAILSIFT_LOOK_BACK_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.look_back_days),
        }
    }
}

/// Gmail API connection settings.
///
/// The access token is expected to be minted externally — OAuth flows and
/// token refresh are out of scope for this process.
#[derive(Debug, Clone)]
pub struct GmailConfig {
    /// API base URL (overridable for tests).
    pub base_url: String,
    /// OAuth bearer token for the `gmail.modify` scope.
    pub access_token: SecretString,
}

impl GmailConfig {
    /// Build from `GMAIL_ACCESS_TOKEN` / `GMAIL_API_BASE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var("GMAIL_ACCESS_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("GMAIL_ACCESS_TOKEN".to_string()))?;
        Ok(Self {
            base_url: std::env::var("GMAIL_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GMAIL_API_BASE.to_string()),
            access_token: SecretString::from(token),
        })
    }
}
