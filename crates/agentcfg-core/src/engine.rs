//! Seam between configuration records and the schema validation engine.

use crate::Options;
use std::fmt;

/// Fallback reason used when an engine fails without saying why.
const UNSPECIFIED_REASON: &str = "schema validation failed";

/// Validates a record projection and returns the normalized map.
///
/// On success the result holds every candidate field (possibly coerced) plus
/// defaults for optional fields the candidate omitted.
pub trait SchemaEngine: Send + Sync {
    fn validate(&self, candidate: &Options) -> Result<Options, ValidationFailure>;
}

/// Ordered, non-empty list of reasons a candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    reasons: Vec<String>,
}

impl ValidationFailure {
    /// Build a failure from engine-reported reasons.
    pub fn new(reasons: Vec<String>) -> Self {
        if reasons.is_empty() {
            return Self::single(UNSPECIFIED_REASON);
        }
        Self { reasons }
    }

    /// Build a failure carrying one reason.
    pub fn single(reason: impl Into<String>) -> Self {
        Self {
            reasons: vec![reason.into()],
        }
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn into_reasons(self) -> Vec<String> {
        self.reasons
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reasons.join(", "))
    }
}

impl std::error::Error for ValidationFailure {}

/// Engine for types that declare no rules; accepts any candidate unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSchema;

impl SchemaEngine for NoSchema {
    fn validate(&self, candidate: &Options) -> Result<Options, ValidationFailure> {
        Ok(candidate.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_failure_gets_a_reason() {
        let failure = ValidationFailure::new(Vec::new());
        assert_eq!(failure.reasons(), &[UNSPECIFIED_REASON.to_string()]);
    }

    #[test]
    fn display_joins_reasons() {
        let failure = ValidationFailure::new(vec!["a: bad".into(), "b: worse".into()]);
        assert_eq!(failure.to_string(), "a: bad, b: worse");
    }

    #[test]
    fn no_schema_passes_candidate_through() {
        let candidate = json!({ "x": 1 }).as_object().cloned().expect("object");
        let normalized = NoSchema.validate(&candidate).expect("valid");
        assert_eq!(normalized, candidate);
    }
}
