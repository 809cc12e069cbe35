//! Typed views over validated records through the public surface.

use agentcfg::schema::coerce;
use agentcfg::{Config, ConfigType, Options, Schema, TypeDecl, ValueKind, init_logging};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;

struct Storage;
struct CachedStorage;

impl ConfigType for Storage {
    type Schema = Schema;
    const FIELDS: &'static [&'static str] = &["path", "read_only"];

    fn schema() -> Schema {
        Schema::new()
            .required("path", ValueKind::String)
            .optional_with_default("read_only", coerce::boolean(), false)
    }
}

impl ConfigType for CachedStorage {
    type Schema = Schema;
    const FIELDS: &'static [&'static str] = &["cache_mb"];

    fn parent() -> Option<TypeDecl> {
        Some(TypeDecl::of::<Storage>())
    }

    fn schema() -> Schema {
        Storage::schema().extend(Schema::new().optional_with_default(
            "cache_mb",
            coerce::integer(),
            64,
        ))
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct CachedStorageView {
    path: String,
    read_only: bool,
    cache_mb: u32,
}

fn options(value: serde_json::Value) -> Options {
    value.as_object().cloned().expect("object")
}

/// String inputs from env-like sources decode into native types.
#[test]
fn env_strings_decode_into_typed_view() {
    init_logging();
    let config = Config::<CachedStorage>::from_options(&options(json!({
        "path": "/var/lib/agent",
        "read_only": "on",
    })))
    .expect("valid");

    let view: CachedStorageView = config.deserialize().expect("decode");
    assert_eq!(
        view,
        CachedStorageView {
            path: "/var/lib/agent".to_string(),
            read_only: true,
            cache_mb: 64,
        }
    );
}

/// Serialized records contain only set fields, in declaration order.
#[test]
fn serializes_set_fields_in_order() {
    let config = Config::<CachedStorage>::from_options(&options(json!({
        "cache_mb": 8,
        "path": "/tmp/a",
    })))
    .expect("valid");
    let rendered = serde_json::to_string(&config).expect("serialize");
    assert_eq!(
        rendered,
        r#"{"path":"/tmp/a","read_only":false,"cache_mb":8}"#
    );
}
