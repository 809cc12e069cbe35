//! Schema declarations and validation of record projections.

use crate::Check;
use agentcfg_core::{Options, SchemaEngine, ValidationFailure};
use log::debug;
use serde_json::{Map, Value};

/// Rule for a single key.
#[derive(Debug, Clone)]
pub struct Rule {
    pub required: bool,
    pub check: Check,
    /// Inserted as-is when an optional key is absent.
    pub default: Option<Value>,
}

/// Ordered set of key rules.
///
/// Unknown keys are rejected unless [`Schema::ignore_extra_keys`] is set, in
/// which case they pass through unchecked.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: Vec<(String, Rule)>,
    ignore_extra_keys: bool,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to be present and pass `check`.
    pub fn required(self, key: impl Into<String>, check: impl Into<Check>) -> Self {
        self.rule(
            key,
            Rule {
                required: true,
                check: check.into(),
                default: None,
            },
        )
    }

    /// Check `key` when present; leave it out otherwise.
    pub fn optional(self, key: impl Into<String>, check: impl Into<Check>) -> Self {
        self.rule(
            key,
            Rule {
                required: false,
                check: check.into(),
                default: None,
            },
        )
    }

    /// Check `key` when present; fill in `default` otherwise.
    pub fn optional_with_default(
        self,
        key: impl Into<String>,
        check: impl Into<Check>,
        default: impl Into<Value>,
    ) -> Self {
        self.rule(
            key,
            Rule {
                required: false,
                check: check.into(),
                default: Some(default.into()),
            },
        )
    }

    /// Insert or replace the rule for `key`, keeping its original position.
    pub fn rule(mut self, key: impl Into<String>, rule: Rule) -> Self {
        let key = key.into();
        match self.rules.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = rule,
            None => self.rules.push((key, rule)),
        }
        self
    }

    pub fn ignore_extra_keys(mut self, ignore: bool) -> Self {
        self.ignore_extra_keys = ignore;
        self
    }

    /// Layer `other` on top of this schema; its rules win on shared keys.
    pub fn extend(mut self, other: Schema) -> Self {
        self.ignore_extra_keys |= other.ignore_extra_keys;
        for (key, rule) in other.rules {
            self = self.rule(key, rule);
        }
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, rule)| rule)
    }

    /// Validate a candidate map, returning it normalized with defaults.
    ///
    /// Every violation is reported, unknown keys first and then rules in
    /// declaration order.
    pub fn validate_map(
        &self,
        candidate: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ValidationFailure> {
        let mut reasons = Vec::new();
        let mut normalized = Map::new();

        for (key, value) in candidate {
            if self.get(key).is_some() {
                continue;
            }
            if self.ignore_extra_keys {
                normalized.insert(key.clone(), value.clone());
            } else {
                reasons.push(invalid_field(key, "unknown key"));
            }
        }

        for (key, rule) in &self.rules {
            match candidate.get(key) {
                Some(value) => match rule.check.run(value.clone()) {
                    Ok(value) => {
                        normalized.insert(key.clone(), value);
                    }
                    Err(message) => reasons.push(invalid_field(key, &message)),
                },
                None if rule.required => {
                    reasons.push(invalid_field(key, "missing required field"));
                }
                None => {
                    if let Some(default) = &rule.default {
                        normalized.insert(key.clone(), default.clone());
                    }
                }
            }
        }

        if reasons.is_empty() {
            Ok(normalized)
        } else {
            debug!("schema rejected candidate (violations={})", reasons.len());
            Err(ValidationFailure::new(reasons))
        }
    }
}

impl SchemaEngine for Schema {
    fn validate(&self, candidate: &Options) -> Result<Options, ValidationFailure> {
        self.validate_map(candidate)
    }
}

/// Build a reason string naming the offending key.
fn invalid_field(key: &str, message: &str) -> String {
    let normalized_key = if key.is_empty() { "root" } else { key };
    format!("{normalized_key}: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ValueKind, coerce};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object")
    }

    fn service_schema() -> Schema {
        Schema::new()
            .required("name", ValueKind::String)
            .required("port", coerce::integer())
            .optional("host", ValueKind::String)
            .optional_with_default("timeout", ValueKind::Integer, 30)
    }

    #[test]
    fn fills_defaults_for_absent_optional_keys() {
        let normalized = service_schema()
            .validate_map(&map(json!({ "name": "api", "port": "8080" })))
            .expect("valid");
        assert_eq!(
            normalized,
            map(json!({ "name": "api", "port": 8080, "timeout": 30 }))
        );
    }

    #[test]
    fn keeps_supplied_values_over_defaults() {
        let normalized = service_schema()
            .validate_map(&map(json!({ "name": "api", "port": 1, "timeout": 5 })))
            .expect("valid");
        assert_eq!(normalized["timeout"], json!(5));
    }

    #[test]
    fn accumulates_every_violation() {
        let failure = service_schema()
            .validate_map(&map(json!({ "extra": true, "name": 3, "host": "h" })))
            .unwrap_err();
        assert_eq!(
            failure.reasons(),
            &[
                "extra: unknown key".to_string(),
                "name: expected string".to_string(),
                "port: missing required field".to_string(),
            ]
        );
    }

    #[test]
    fn extra_keys_pass_through_when_ignored() {
        let normalized = Schema::new()
            .optional("a", ValueKind::Bool)
            .ignore_extra_keys(true)
            .validate_map(&map(json!({ "a": true, "b": "kept" })))
            .expect("valid");
        assert_eq!(normalized, map(json!({ "b": "kept", "a": true })));
    }

    #[test]
    fn extend_overrides_shared_keys_in_place() {
        let child = service_schema().extend(
            Schema::new()
                .optional_with_default("port", coerce::integer(), 80)
                .optional("tls", coerce::boolean()),
        );
        let keys: Vec<_> = child.keys().collect();
        assert_eq!(keys, vec!["name", "port", "host", "timeout", "tls"]);
        assert!(!child.get("port").expect("port rule").required);

        let normalized = child
            .validate_map(&map(json!({ "name": "api", "tls": "yes" })))
            .expect("valid");
        assert_eq!(
            normalized,
            map(json!({ "name": "api", "port": 80, "timeout": 30, "tls": true }))
        );
    }

    #[test]
    fn defaults_are_not_checked() {
        let normalized = Schema::new()
            .optional_with_default("level", Check::one_of(["info", "debug"]), Value::Null)
            .validate_map(&Map::new())
            .expect("valid");
        assert_eq!(normalized["level"], Value::Null);
    }
}
