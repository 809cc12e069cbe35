use crate::RecordingEngine;
use agentcfg_core::{ConfigType, NoSchema, Options, TypeDecl};
use agentcfg_schema::{Check, Schema, ValueKind, coerce};
use serde_json::Value;

/// Turn a `json!` object literal into options.
pub fn options(value: Value) -> Options {
    match value {
        Value::Object(map) => map,
        other => panic!("options fixture must be an object, got {other}"),
    }
}

/// Three-link chain declaring `a`, `b` and `c`.
pub struct ChainA;
pub struct ChainB;
pub struct ChainC;

impl ConfigType for ChainA {
    type Schema = NoSchema;
    const FIELDS: &'static [&'static str] = &["a"];

    fn schema() -> NoSchema {
        NoSchema
    }
}

impl ConfigType for ChainB {
    type Schema = NoSchema;
    const FIELDS: &'static [&'static str] = &["b"];

    fn parent() -> Option<TypeDecl> {
        Some(TypeDecl::of::<ChainA>())
    }

    fn schema() -> NoSchema {
        NoSchema
    }
}

impl ConfigType for ChainC {
    type Schema = NoSchema;
    const FIELDS: &'static [&'static str] = &["c"];

    fn parent() -> Option<TypeDecl> {
        Some(TypeDecl::of::<ChainB>())
    }

    fn schema() -> NoSchema {
        NoSchema
    }
}

/// Root agent settings: a required name and a log level.
pub struct BaseAgent;

impl ConfigType for BaseAgent {
    type Schema = Schema;
    const FIELDS: &'static [&'static str] = &["name", "log_level"];

    fn schema() -> Schema {
        Schema::new()
            .required("name", ValueKind::String)
            .optional_with_default(
                "log_level",
                Check::one_of(["error", "warn", "info", "debug"]),
                "info",
            )
    }
}

/// Adds a required port and a defaulted host.
pub struct NetworkAgent;

impl ConfigType for NetworkAgent {
    type Schema = Schema;
    const FIELDS: &'static [&'static str] = &["host", "port"];

    fn parent() -> Option<TypeDecl> {
        Some(TypeDecl::of::<BaseAgent>())
    }

    fn schema() -> Schema {
        BaseAgent::schema().extend(
            Schema::new()
                .optional_with_default("host", ValueKind::String, "127.0.0.1")
                .required(
                    "port",
                    Check::and([
                        coerce::integer(),
                        Check::predicate("port range", |value| {
                            value.as_u64().is_some_and(|port| (1..=65535).contains(&port))
                        }),
                    ]),
                ),
        )
    }
}

/// Adds a timeout defaulting to 30 seconds and relaxes the log level rule.
pub struct TimedAgent;

impl ConfigType for TimedAgent {
    type Schema = Schema;
    const FIELDS: &'static [&'static str] = &["timeout"];

    fn parent() -> Option<TypeDecl> {
        Some(TypeDecl::of::<NetworkAgent>())
    }

    fn schema() -> Schema {
        NetworkAgent::schema().extend(
            Schema::new()
                .optional_with_default("timeout", coerce::integer(), 30)
                .optional_with_default("log_level", ValueKind::String, "info"),
        )
    }
}

/// Declares nothing of its own.
pub struct InheritOnly;

impl ConfigType for InheritOnly {
    type Schema = Schema;
    const FIELDS: &'static [&'static str] = &[];

    fn parent() -> Option<TypeDecl> {
        Some(TypeDecl::of::<TimedAgent>())
    }

    fn schema() -> Schema {
        TimedAgent::schema()
    }
}

/// Records what the engine was handed; see [`crate::take_recorded`].
pub struct Probe;

impl ConfigType for Probe {
    type Schema = RecordingEngine;
    const FIELDS: &'static [&'static str] = &["first", "second", "third"];

    fn schema() -> RecordingEngine {
        RecordingEngine::new(
            Schema::new()
                .optional("first", Check::Any)
                .optional("second", Check::Any)
                .optional_with_default("third", Check::Any, "filled"),
        )
    }
}
