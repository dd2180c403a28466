//! Rule data model, loading, and matching.
//!
//! Rules come from a JSON file: a list of records with a `mode`
//! ("all"/"any"), a non-empty list of conditions, and a list of
//! actions. The whole file is validated eagerly at load time — a single
//! malformed rule rejects the set, so evaluation only ever sees
//! well-formed rules.
//!
//! Matching is pure: no I/O, no shared state. Text comparisons are
//! case-insensitive; date conditions compare the message age in whole
//! days against the evaluation instant passed by the caller.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::pipeline::types::MessageRecord;

/// How a rule combines its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    /// Every condition must hold.
    All,
    /// At least one condition must hold.
    Any,
}

/// Message attribute a text condition compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    From,
    Subject,
    Message,
}

impl TextField {
    fn as_str(&self) -> &'static str {
        match self {
            TextField::From => "from",
            TextField::Subject => "subject",
            TextField::Message => "message",
        }
    }
}

/// Predicates valid for text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPredicate {
    Contains,
    DoesNotContain,
    Equals,
    DoesNotEqual,
}

/// Predicates valid for the `date_received` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgePredicate {
    LessThanDays,
    GreaterThanDays,
}

/// A single predicate test against one message field.
///
/// The text/date split is closed at the type level: a date predicate on
/// a text field (or vice versa) cannot be represented and is rejected
/// during loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Text {
        field: TextField,
        predicate: TextPredicate,
        value: String,
    },
    Age {
        predicate: AgePredicate,
        days: i64,
    },
}

impl Condition {
    /// Evaluate this condition against a message at instant `now`.
    ///
    /// An absent field value (e.g. a message without a subject) makes
    /// positive predicates false and their negations true — a bad
    /// message shape is a non-match, never an error.
    fn eval(&self, msg: &MessageRecord, now: DateTime<Utc>) -> bool {
        match self {
            Condition::Text {
                field,
                predicate,
                value,
            } => {
                let text = match field {
                    TextField::From => Some(msg.from_email.as_str()),
                    TextField::Subject => msg.subject.as_deref(),
                    TextField::Message => Some(msg.body.as_str()),
                };
                let Some(text) = text else {
                    return matches!(
                        predicate,
                        TextPredicate::DoesNotContain | TextPredicate::DoesNotEqual
                    );
                };
                let haystack = text.to_lowercase();
                let needle = value.to_lowercase();
                match predicate {
                    TextPredicate::Contains => haystack.contains(&needle),
                    TextPredicate::DoesNotContain => !haystack.contains(&needle),
                    TextPredicate::Equals => haystack == needle,
                    TextPredicate::DoesNotEqual => haystack != needle,
                }
            }
            Condition::Age { predicate, days } => {
                let age_days = (now - msg.date_received).num_days();
                match predicate {
                    AgePredicate::LessThanDays => age_days < *days,
                    AgePredicate::GreaterThanDays => age_days > *days,
                }
            }
        }
    }
}

/// A state-mutating intent to apply to a matching message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MarkRead,
    MarkUnread,
    MoveMessage { mailbox: String },
}

/// A named condition-set + action-set pair.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Free-text label, informational only.
    pub description: String,
    pub mode: RuleMode,
    /// Non-empty; enforced at load time.
    pub conditions: Vec<Condition>,
    /// May be empty (a valid no-op rule).
    pub actions: Vec<Action>,
}

impl Rule {
    /// Whether this rule matches the message at instant `now`.
    pub fn matches(&self, msg: &MessageRecord, now: DateTime<Utc>) -> bool {
        match self.mode {
            RuleMode::All => self.conditions.iter().all(|c| c.eval(msg, now)),
            RuleMode::Any => self.conditions.iter().any(|c| c.eval(msg, now)),
        }
    }
}

/// An ordered, immutable set of validated rules.
///
/// Constructed once at startup and passed by reference to each
/// evaluation call.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Load and validate rules from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let set = Self::from_json(&raw)?;
        debug!(path = %path.display(), rules = set.len(), "Loaded rule set");
        Ok(set)
    }

    /// Parse and validate rules from a JSON string.
    ///
    /// All-or-nothing: the first invalid rule fails the whole load and
    /// zero rules survive.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let raw_rules: Vec<RawRule> =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let rules = raw_rules
            .into_iter()
            .enumerate()
            .map(|(index, raw)| validate_rule(index, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Collect the actions of every matching rule, in rule order.
    ///
    /// All matching rules fire — this is deliberately not
    /// first-match-wins. A message matching several rules accumulates
    /// all their actions; the applier resolves same-category conflicts
    /// by applying them in order.
    pub fn evaluate(&self, msg: &MessageRecord, now: DateTime<Utc>) -> Vec<Action> {
        let mut actions = Vec::new();
        for rule in &self.rules {
            if rule.matches(msg, now) {
                debug!(
                    message_id = %msg.message_id,
                    rule = %rule.description,
                    "Rule matched"
                );
                actions.extend(rule.actions.iter().cloned());
            }
        }
        actions
    }
}

// ── Raw (pre-validation) shapes ─────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawRule {
    #[serde(default)]
    description: String,
    mode: Option<String>,
    conditions: Option<Vec<RawCondition>>,
    actions: Option<Vec<RawAction>>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    field: Option<String>,
    predicate: Option<String>,
    value: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    kind: Option<String>,
    mailbox: Option<String>,
}

/// Diagnostic label identifying a rule in error messages.
fn rule_label(index: usize, description: &str) -> String {
    if description.is_empty() {
        format!("#{index}")
    } else {
        format!("#{index} ({description:?})")
    }
}

fn validate_rule(index: usize, raw: RawRule) -> Result<Rule, ConfigError> {
    let label = rule_label(index, &raw.description);

    let mode_str = raw.mode.ok_or_else(|| ConfigError::MissingField {
        rule: label.clone(),
        field: "mode",
    })?;
    let mode = match mode_str.to_lowercase().as_str() {
        "all" => RuleMode::All,
        "any" => RuleMode::Any,
        _ => {
            return Err(ConfigError::InvalidMode {
                rule: label,
                mode: mode_str,
            });
        }
    };

    let raw_conditions = raw.conditions.ok_or_else(|| ConfigError::MissingField {
        rule: label.clone(),
        field: "conditions",
    })?;
    if raw_conditions.is_empty() {
        return Err(ConfigError::NoConditions { rule: label });
    }
    let conditions = raw_conditions
        .into_iter()
        .map(|c| validate_condition(&label, c))
        .collect::<Result<Vec<_>, _>>()?;

    let raw_actions = raw.actions.ok_or_else(|| ConfigError::MissingField {
        rule: label.clone(),
        field: "actions",
    })?;
    let actions = raw_actions
        .into_iter()
        .map(|a| validate_action(&label, a))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Rule {
        description: raw.description,
        mode,
        conditions,
        actions,
    })
}

fn validate_condition(label: &str, raw: RawCondition) -> Result<Condition, ConfigError> {
    let field_str = raw.field.ok_or_else(|| ConfigError::MissingField {
        rule: label.to_string(),
        field: "field",
    })?;
    let predicate_str = raw.predicate.ok_or_else(|| ConfigError::MissingField {
        rule: label.to_string(),
        field: "predicate",
    })?;
    let value = raw.value.ok_or_else(|| ConfigError::MissingField {
        rule: label.to_string(),
        field: "value",
    })?;

    let text_field = match field_str.to_lowercase().as_str() {
        "from" => Some(TextField::From),
        "subject" => Some(TextField::Subject),
        "message" => Some(TextField::Message),
        "date_received" => None,
        _ => {
            return Err(ConfigError::UnknownField {
                rule: label.to_string(),
                field: field_str,
            });
        }
    };

    let text_predicate = match predicate_str.to_lowercase().as_str() {
        "contains" => Some(TextPredicate::Contains),
        "does_not_contain" => Some(TextPredicate::DoesNotContain),
        "equals" => Some(TextPredicate::Equals),
        "does_not_equal" => Some(TextPredicate::DoesNotEqual),
        _ => None,
    };
    let age_predicate = match predicate_str.to_lowercase().as_str() {
        "less_than_days" => Some(AgePredicate::LessThanDays),
        "greater_than_days" => Some(AgePredicate::GreaterThanDays),
        _ => None,
    };

    match (text_field, text_predicate, age_predicate) {
        (Some(field), Some(predicate), _) => {
            let value = value_as_text(label, value)?;
            Ok(Condition::Text {
                field,
                predicate,
                value,
            })
        }
        (None, _, Some(predicate)) => {
            let days = value_as_days(label, value)?;
            Ok(Condition::Age { predicate, days })
        }
        // Date predicate on a text field, text predicate on the date
        // field, or a predicate nobody recognizes.
        (text_field, _, _) => Err(ConfigError::InvalidPredicate {
            rule: label.to_string(),
            field: text_field.map_or("date_received".to_string(), |f| f.as_str().to_string()),
            predicate: predicate_str,
        }),
    }
}

fn value_as_text(label: &str, value: serde_json::Value) -> Result<String, ConfigError> {
    match value {
        serde_json::Value::String(s) => Ok(s),
        other => Err(ConfigError::InvalidValue {
            key: format!("rule {label} condition value"),
            message: format!("expected a string, got {other}"),
        }),
    }
}

/// Parse a date-condition value as a non-negative day count.
///
/// The original rule data writes day counts as JSON strings, so both
/// `2` and `"2"` are accepted.
fn value_as_days(label: &str, value: serde_json::Value) -> Result<i64, ConfigError> {
    let days = match &value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match days {
        Some(d) if d >= 0 => Ok(d),
        _ => Err(ConfigError::InvalidDays {
            rule: label.to_string(),
            value: value.to_string(),
        }),
    }
}

fn validate_action(label: &str, raw: RawAction) -> Result<Action, ConfigError> {
    let kind = raw.kind.ok_or_else(|| ConfigError::MissingField {
        rule: label.to_string(),
        field: "type",
    })?;
    match kind.to_lowercase().as_str() {
        "mark_read" => Ok(Action::MarkRead),
        "mark_unread" => Ok(Action::MarkUnread),
        "move_message" => match raw.mailbox {
            Some(mailbox) if !mailbox.is_empty() => Ok(Action::MoveMessage { mailbox }),
            _ => Err(ConfigError::MissingMailbox {
                rule: label.to_string(),
            }),
        },
        _ => Err(ConfigError::UnknownAction {
            rule: label.to_string(),
            action: kind,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_message(from: &str, subject: Option<&str>, body: &str, age_days: i64) -> MessageRecord {
        let now = Utc::now();
        MessageRecord {
            message_id: "m-1".into(),
            thread_id: "t-1".into(),
            from_email: from.into(),
            subject: subject.map(String::from),
            body: body.into(),
            date_received: now - Duration::days(age_days),
            labels: vec!["INBOX".into(), "UNREAD".into()],
        }
    }

    fn single_rule(mode: &str, conditions: &str, actions: &str) -> String {
        format!(
            r#"[{{"description": "test", "mode": "{mode}", "conditions": [{conditions}], "actions": [{actions}]}}]"#
        )
    }

    // ── Loading / validation ────────────────────────────────────

    #[test]
    fn loads_valid_rules() {
        let json = r#"[
            {
                "description": "Interview follow-up",
                "mode": "all",
                "conditions": [
                    {"field": "from", "predicate": "contains", "value": "tenmiles.com"},
                    {"field": "subject", "predicate": "contains", "value": "Interview"},
                    {"field": "date_received", "predicate": "less_than_days", "value": "2"}
                ],
                "actions": [
                    {"type": "move_message", "mailbox": "INBOX"},
                    {"type": "mark_unread"}
                ]
            },
            {
                "description": "Promotions",
                "mode": "ANY",
                "conditions": [
                    {"field": "subject", "predicate": "contains", "value": "newsletter"}
                ],
                "actions": [{"type": "mark_read"}]
            }
        ]"#;
        let set = RuleSet::from_json(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.rules()[0].mode, RuleMode::All);
        // Mode is case-insensitive, normalized to the enum
        assert_eq!(set.rules()[1].mode, RuleMode::Any);
        assert_eq!(set.rules()[0].conditions.len(), 3);
        assert_eq!(
            set.rules()[0].actions,
            vec![
                Action::MoveMessage {
                    mailbox: "INBOX".into()
                },
                Action::MarkUnread
            ]
        );
    }

    #[test]
    fn date_value_accepts_number_or_string() {
        for value in [r#""30""#, "30"] {
            let json = single_rule(
                "all",
                &format!(
                    r#"{{"field": "date_received", "predicate": "greater_than_days", "value": {value}}}"#
                ),
                r#"{"type": "mark_read"}"#,
            );
            let set = RuleSet::from_json(&json).unwrap();
            assert_eq!(
                set.rules()[0].conditions[0],
                Condition::Age {
                    predicate: AgePredicate::GreaterThanDays,
                    days: 30
                }
            );
        }
    }

    #[test]
    fn rejects_non_list_source() {
        let err = RuleSet::from_json(r#"{"mode": "all"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_missing_mode() {
        let json = r#"[{"conditions": [{"field": "from", "predicate": "contains", "value": "x"}], "actions": []}]"#;
        let err = RuleSet::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField { field: "mode", .. }
        ));
    }

    #[test]
    fn rejects_unknown_mode() {
        let json = r#"[{"mode": "some", "conditions": [{"field": "from", "predicate": "contains", "value": "x"}], "actions": []}]"#;
        let err = RuleSet::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMode { .. }));
    }

    #[test]
    fn rejects_empty_conditions() {
        let json = r#"[{"mode": "all", "conditions": [], "actions": []}]"#;
        let err = RuleSet::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::NoConditions { .. }));
    }

    #[test]
    fn rejects_unknown_field() {
        let json = single_rule(
            "all",
            r#"{"field": "to", "predicate": "contains", "value": "x"}"#,
            r#"{"type": "mark_read"}"#,
        );
        let err = RuleSet::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownField { .. }));
    }

    #[test]
    fn rejects_unknown_predicate() {
        let json = single_rule(
            "all",
            r#"{"field": "from", "predicate": "sounds_like", "value": "x"}"#,
            r#"{"type": "mark_read"}"#,
        );
        let err = RuleSet::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPredicate { .. }));
    }

    #[test]
    fn rejects_date_predicate_on_text_field() {
        let json = single_rule(
            "all",
            r#"{"field": "subject", "predicate": "less_than_days", "value": "2"}"#,
            r#"{"type": "mark_read"}"#,
        );
        let err = RuleSet::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPredicate { .. }));
    }

    #[test]
    fn rejects_text_predicate_on_date_field() {
        let json = single_rule(
            "all",
            r#"{"field": "date_received", "predicate": "contains", "value": "2"}"#,
            r#"{"type": "mark_read"}"#,
        );
        let err = RuleSet::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPredicate { .. }));
    }

    #[test]
    fn rejects_negative_days() {
        let json = single_rule(
            "all",
            r#"{"field": "date_received", "predicate": "less_than_days", "value": "-1"}"#,
            r#"{"type": "mark_read"}"#,
        );
        let err = RuleSet::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDays { .. }));
    }

    #[test]
    fn rejects_non_numeric_days() {
        let json = single_rule(
            "all",
            r#"{"field": "date_received", "predicate": "less_than_days", "value": "soon"}"#,
            r#"{"type": "mark_read"}"#,
        );
        let err = RuleSet::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDays { .. }));
    }

    #[test]
    fn rejects_move_without_mailbox() {
        let json = single_rule(
            "all",
            r#"{"field": "from", "predicate": "contains", "value": "x"}"#,
            r#"{"type": "move_message"}"#,
        );
        let err = RuleSet::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::MissingMailbox { .. }));
    }

    #[test]
    fn rejects_unknown_action_type() {
        let json = single_rule(
            "all",
            r#"{"field": "from", "predicate": "contains", "value": "x"}"#,
            r#"{"type": "delete_message"}"#,
        );
        let err = RuleSet::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAction { .. }));
    }

    #[test]
    fn empty_actions_is_a_valid_noop_rule() {
        let json = r#"[{"mode": "all", "conditions": [{"field": "from", "predicate": "contains", "value": "x"}], "actions": []}]"#;
        let set = RuleSet::from_json(json).unwrap();
        assert!(set.rules()[0].actions.is_empty());
    }

    // ── Matching ────────────────────────────────────────────────

    fn text_rule(mode: RuleMode, conditions: Vec<Condition>) -> Rule {
        Rule {
            description: "test".into(),
            mode,
            conditions,
            actions: vec![Action::MarkRead],
        }
    }

    fn contains(field: TextField, value: &str) -> Condition {
        Condition::Text {
            field,
            predicate: TextPredicate::Contains,
            value: value.into(),
        }
    }

    #[test]
    fn contains_is_case_insensitive() {
        let rule = text_rule(RuleMode::All, vec![contains(TextField::Subject, "Interview")]);
        let msg = make_message("a@b.com", Some("interview scheduled"), "", 0);
        let now = Utc::now();
        assert!(rule.matches(&msg, now));
    }

    #[test]
    fn equals_is_case_insensitive() {
        let rule = text_rule(
            RuleMode::All,
            vec![Condition::Text {
                field: TextField::From,
                predicate: TextPredicate::Equals,
                value: "HR@TenMiles.com".into(),
            }],
        );
        let msg = make_message("hr@tenmiles.com", None, "", 0);
        assert!(rule.matches(&msg, Utc::now()));
    }

    #[test]
    fn negative_predicates_negate_their_positives() {
        let now = Utc::now();
        let msg = make_message("hr@tenmiles.com", Some("Interview Invite"), "body", 0);
        for (field, value) in [
            (TextField::From, "tenmiles"),
            (TextField::Subject, "interview"),
            (TextField::Message, "nothing-here"),
        ] {
            let pos = Condition::Text {
                field,
                predicate: TextPredicate::Contains,
                value: value.into(),
            };
            let neg = Condition::Text {
                field,
                predicate: TextPredicate::DoesNotContain,
                value: value.into(),
            };
            assert_ne!(pos.eval(&msg, now), neg.eval(&msg, now));

            let pos = Condition::Text {
                field,
                predicate: TextPredicate::Equals,
                value: value.into(),
            };
            let neg = Condition::Text {
                field,
                predicate: TextPredicate::DoesNotEqual,
                value: value.into(),
            };
            assert_ne!(pos.eval(&msg, now), neg.eval(&msg, now));
        }
    }

    #[test]
    fn missing_subject_is_a_non_match_for_positive_predicates() {
        let now = Utc::now();
        let msg = make_message("a@b.com", None, "", 0);
        let pos = contains(TextField::Subject, "anything");
        let neg = Condition::Text {
            field: TextField::Subject,
            predicate: TextPredicate::DoesNotContain,
            value: "anything".into(),
        };
        assert!(!pos.eval(&msg, now));
        assert!(neg.eval(&msg, now));
    }

    #[test]
    fn less_than_days_boundary_does_not_match() {
        let now = Utc::now();
        let cond = Condition::Age {
            predicate: AgePredicate::LessThanDays,
            days: 2,
        };
        // Pin date_received to the test's own `now` so "exactly N
        // days" is exact; make_message's internal Utc::now() is a
        // hair later, which would truncate the age to N-1 days.
        let at_days = |n: i64| {
            let mut msg = make_message("a@b.com", None, "", 0);
            msg.date_received = now - Duration::days(n);
            msg
        };
        let one_day = at_days(1);
        let exactly_two = at_days(2);
        let three_days = at_days(3);
        assert!(cond.eval(&one_day, now));
        assert!(!cond.eval(&exactly_two, now));
        assert!(!cond.eval(&three_days, now));
    }

    #[test]
    fn greater_than_days_boundary_does_not_match() {
        let now = Utc::now();
        let cond = Condition::Age {
            predicate: AgePredicate::GreaterThanDays,
            days: 30,
        };
        // Same `now`-pinning as the less_than boundary test above.
        let at_days = |n: i64| {
            let mut msg = make_message("a@b.com", None, "", 0);
            msg.date_received = now - Duration::days(n);
            msg
        };
        assert!(!cond.eval(&at_days(30), now));
        assert!(cond.eval(&at_days(31), now));
        assert!(!cond.eval(&at_days(29), now));
    }

    #[test]
    fn all_mode_requires_every_condition() {
        let rule = text_rule(
            RuleMode::All,
            vec![
                contains(TextField::From, "tenmiles"),
                contains(TextField::Subject, "interview"),
            ],
        );
        let now = Utc::now();
        let both = make_message("hr@tenmiles.com", Some("Interview Invite"), "", 0);
        let one = make_message("hr@tenmiles.com", Some("Offer letter"), "", 0);
        assert!(rule.matches(&both, now));
        assert!(!rule.matches(&one, now));
    }

    #[test]
    fn any_mode_requires_one_condition() {
        let rule = text_rule(
            RuleMode::Any,
            vec![
                contains(TextField::From, "newsletter"),
                contains(TextField::Subject, "Promotion"),
                contains(TextField::Subject, "BENQ"),
            ],
        );
        let now = Utc::now();
        // Subject alone matches even though the sender doesn't
        let benq = make_message("deals@retailer.com", Some("BENQ monitor deal"), "", 0);
        let neither = make_message("alice@work.com", Some("Standup notes"), "", 0);
        assert!(rule.matches(&benq, now));
        assert!(!rule.matches(&neither, now));
    }

    #[test]
    fn evaluate_accumulates_actions_from_all_matching_rules() {
        let json = r#"[
            {"description": "first", "mode": "all",
             "conditions": [{"field": "from", "predicate": "contains", "value": "tenmiles"}],
             "actions": [{"type": "move_message", "mailbox": "INBOX"}]},
            {"description": "unmatched", "mode": "all",
             "conditions": [{"field": "subject", "predicate": "contains", "value": "absent"}],
             "actions": [{"type": "mark_read"}]},
            {"description": "second", "mode": "all",
             "conditions": [{"field": "subject", "predicate": "contains", "value": "interview"}],
             "actions": [{"type": "mark_unread"}]}
        ]"#;
        let set = RuleSet::from_json(json).unwrap();
        let msg = make_message("hr@tenmiles.com", Some("Interview Invite"), "", 0);
        let actions = set.evaluate(&msg, Utc::now());
        assert_eq!(
            actions,
            vec![
                Action::MoveMessage {
                    mailbox: "INBOX".into()
                },
                Action::MarkUnread
            ]
        );
    }

    #[test]
    fn spec_interview_rule_end_to_end() {
        let json = r#"[{
            "description": "Recent interview mail",
            "mode": "all",
            "conditions": [
                {"field": "from", "predicate": "contains", "value": "tenmiles.com"},
                {"field": "subject", "predicate": "contains", "value": "Interview"},
                {"field": "date_received", "predicate": "less_than_days", "value": "2"}
            ],
            "actions": [
                {"type": "move_message", "mailbox": "INBOX"},
                {"type": "mark_unread"}
            ]
        }]"#;
        let set = RuleSet::from_json(json).unwrap();
        let now = Utc::now();

        let fresh = make_message("hr@tenmiles.com", Some("Interview Invite"), "", 1);
        assert_eq!(
            set.evaluate(&fresh, now),
            vec![
                Action::MoveMessage {
                    mailbox: "INBOX".into()
                },
                Action::MarkUnread
            ]
        );

        let stale = make_message("hr@tenmiles.com", Some("Interview Invite"), "", 3);
        assert!(set.evaluate(&stale, now).is_empty());
    }
}
