//! Rule-based schema engine for configuration records.
//!
//! A [`Schema`] maps field names to rules: required or optional, a [`Check`]
//! the value must pass (type, allowed values, predicate, or a coercing
//! transform), and an optional default. Schemas compose with
//! [`Schema::extend`], which is how record types build on their parent's
//! rules.

mod check;
pub mod coerce;
mod schema;

/// Value checks and value kinds.
pub use check::{Check, PredicateFn, TransformFn, ValueKind};
/// Schema rules and validation.
pub use schema::{Rule, Schema};
