//! Checks applied to a single field value.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Predicate over a field value.
pub type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
/// Transform replacing a field value, or explaining why it cannot.
pub type TransformFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// JSON value kinds a field can be constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Number,
    Bool,
    Array,
    Object,
}

impl ValueKind {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ValueKind::String => value.is_string(),
            ValueKind::Integer => value.is_u64() || value.is_i64(),
            ValueKind::Number => value.is_number(),
            ValueKind::Bool => value.is_boolean(),
            ValueKind::Array => value.is_array(),
            ValueKind::Object => value.is_object(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Number => "number",
            ValueKind::Bool => "bool",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A check a present field value must pass.
#[derive(Clone)]
pub enum Check {
    /// Accept any value.
    Any,
    /// Require a JSON kind.
    Kind(ValueKind),
    /// Require one of the listed values.
    OneOf(Vec<Value>),
    /// Require a named predicate to hold.
    Predicate { name: &'static str, test: PredicateFn },
    /// Replace the value with the transform's output.
    Use {
        name: &'static str,
        transform: TransformFn,
    },
    /// Run checks in order, each seeing the previous output.
    And(Vec<Check>),
}

impl Check {
    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Check::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn predicate(
        name: &'static str,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Check::Predicate {
            name,
            test: Arc::new(test),
        }
    }

    pub fn transform(
        name: &'static str,
        transform: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Check::Use {
            name,
            transform: Arc::new(transform),
        }
    }

    pub fn and(checks: impl IntoIterator<Item = Check>) -> Self {
        Check::And(checks.into_iter().collect())
    }

    /// Run the check, returning the (possibly transformed) value.
    pub(crate) fn run(&self, value: Value) -> Result<Value, String> {
        match self {
            Check::Any => Ok(value),
            Check::Kind(kind) => {
                if kind.matches(&value) {
                    Ok(value)
                } else {
                    Err(format!("expected {kind}"))
                }
            }
            Check::OneOf(allowed) => {
                if allowed.contains(&value) {
                    Ok(value)
                } else {
                    let listed: Vec<String> = allowed.iter().map(Value::to_string).collect();
                    Err(format!("{value} is not one of [{}]", listed.join(", ")))
                }
            }
            Check::Predicate { name, test } => {
                if test(&value) {
                    Ok(value)
                } else {
                    Err(format!("{value} does not satisfy {name}"))
                }
            }
            Check::Use { transform, .. } => transform(&value),
            Check::And(checks) => checks
                .iter()
                .try_fold(value, |value, check| check.run(value)),
        }
    }
}

impl From<ValueKind> for Check {
    fn from(kind: ValueKind) -> Self {
        Check::Kind(kind)
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Any => f.write_str("Any"),
            Check::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            Check::OneOf(values) => f.debug_tuple("OneOf").field(values).finish(),
            Check::Predicate { name, .. } => f.debug_tuple("Predicate").field(name).finish(),
            Check::Use { name, .. } => f.debug_tuple("Use").field(name).finish(),
            Check::And(checks) => f.debug_tuple("And").field(checks).finish(),
        }
    }
}
