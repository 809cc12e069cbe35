//! Public surface for agentcfg.
//!
//! Re-exports the record type and the rule engine, and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use agentcfg_core as record;
/// Re-export for convenience.
pub use agentcfg_schema as schema;

pub use agentcfg_core::{Config, ConfigError, ConfigType, Options, TypeDecl};
pub use agentcfg_schema::{Check, Schema, ValueKind};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
