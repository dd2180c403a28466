use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};

use mailsift::config::{AppConfig, GmailConfig};
use mailsift::gmail::{GmailClient, MailMutator};
use mailsift::pipeline::{ApplyOutcome, RuleProcessor, RuleSet};
use mailsift::store::{LibSqlStore, MessageStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut config = AppConfig::from_env();
    if let Some(days) = parse_look_back_arg(std::env::args().skip(1))? {
        config.look_back_days = days;
    }

    eprintln!("📬 mailsift v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Rules: {}", config.rules_path);
    eprintln!("   Database: {}", config.db_path);
    eprintln!("   Look back: {} days\n", config.look_back_days);

    // Rules are validated before anything touches the network — a bad
    // rule file aborts the run with zero rules loaded.
    let rules = match RuleSet::load(Path::new(&config.rules_path)) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Error: invalid rules file {}: {e}", config.rules_path);
            std::process::exit(1);
        }
    };
    if rules.is_empty() {
        warn!("Rules file is empty, no actions will be applied");
    }

    let gmail_config = GmailConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export GMAIL_ACCESS_TOKEN=ya29....");
        std::process::exit(1);
    });
    let client = Arc::new(GmailClient::new(gmail_config));

    let store: Arc<dyn MessageStore> = Arc::new(
        LibSqlStore::new_local(Path::new(&config.db_path))
            .await
            .with_context(|| format!("Failed to open database at {}", config.db_path))?,
    );

    // Fetch the look-back window and mirror it locally
    let since = Utc::now() - chrono::Duration::days(config.look_back_days as i64);
    let fetched = client.fetch_messages(since).await?;
    for msg in &fetched {
        store.upsert_message(msg).await?;
    }
    info!(count = fetched.len(), "Fetched and stored messages");

    // Run every stored message through the rule engine
    let messages = store.get_all_messages().await?;
    let mutator: Arc<dyn MailMutator> = client;
    let processor = RuleProcessor::new(rules, mutator, store);
    let results = processor.process(&messages, Utc::now()).await;

    let mut matched = 0usize;
    let mut partial = 0usize;
    let mut failed = 0usize;
    for result in &results {
        if !result.actions.is_empty() {
            matched += 1;
        }
        match result.outcome {
            ApplyOutcome::Applied => {}
            ApplyOutcome::Partial { .. } => partial += 1,
            ApplyOutcome::Failed(_) => failed += 1,
        }
    }

    info!(
        processed = results.len(),
        matched,
        applied = matched - partial - failed,
        partial,
        failed,
        "Run complete"
    );

    Ok(())
}

/// Parse `--look-back <days>` from the command line.
///
/// Returns `None` when the flag is absent (the config default
/// applies); a non-positive or non-numeric value is a startup error.
fn parse_look_back_arg(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<u32>> {
    while let Some(arg) = args.next() {
        if arg == "--look-back" {
            let value = args
                .next()
                .ok_or_else(|| anyhow::anyhow!("--look-back requires a value"))?;
            let days: u32 = value
                .parse()
                .ok()
                .filter(|d| *d > 0)
                .ok_or_else(|| {
                    anyhow::anyhow!("--look-back must be a positive integer, got {value}")
                })?;
            return Ok(Some(days));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Option<u32>> {
        parse_look_back_arg(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn absent_flag_falls_back_to_config_default() {
        assert_eq!(parse(&[]).unwrap(), None);
        assert_eq!(parse(&["--verbose"]).unwrap(), None);
    }

    #[test]
    fn valid_value_is_parsed() {
        assert_eq!(parse(&["--look-back", "5"]).unwrap(), Some(5));
        assert_eq!(parse(&["--look-back", "365"]).unwrap(), Some(365));
    }

    #[test]
    fn zero_is_rejected() {
        assert!(parse(&["--look-back", "0"]).is_err());
    }

    #[test]
    fn negative_value_is_rejected() {
        assert!(parse(&["--look-back", "-3"]).is_err());
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        assert!(parse(&["--look-back", "soon"]).is_err());
    }

    #[test]
    fn missing_value_is_rejected() {
        assert!(parse(&["--look-back"]).is_err());
    }
}
