//! Rule processing pipeline.
//!
//! Every stored message flows through:
//! 1. `RuleSet::evaluate()` — collects actions from all matching rules,
//!    in rule order.
//! 2. `RuleProcessor::process()` — applies the actions as label
//!    mutations via the Gmail client and records the resulting label
//!    state in the store.
//!
//! Evaluation is pure (no I/O); all side effects are confined to the
//! mutation and persistence interfaces.

pub mod processor;
pub mod rules;
pub mod types;

pub use processor::RuleProcessor;
pub use rules::{Action, Condition, Rule, RuleMode, RuleSet};
pub use types::{ApplyOutcome, MessageRecord, ProcessedMessage};
