//! Configuration records with declared fields and schema-backed validation.
//!
//! A record type names the fields it adds through [`ConfigType`], optionally
//! extending a parent type. The first record of a type resolves the whole
//! extends chain into one flat field list; records are then filled from an
//! untyped options map and validated by the type's [`SchemaEngine`].

mod engine;
mod error;
mod record;
mod registry;
mod value;

/// Schema engine seam and its failure type.
pub use engine::{NoSchema, SchemaEngine, ValidationFailure};
/// Public error type returned by validation and decoding.
pub use error::ConfigError;
/// The configuration record itself.
pub use record::Config;
/// Type declarations and the resolved type table.
pub use registry::{ConfigType, TypeDecl, registered_types};
/// Value model helpers.
pub use value::{Options, is_present};
