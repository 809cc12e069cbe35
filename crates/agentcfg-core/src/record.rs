//! The configuration record: declared fields, update, and validation.

use crate::registry::{self, TypeEntry};
use crate::{ConfigError, ConfigType, Options, is_present};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;
use std::sync::Arc;

/// Returned when indexing a field that holds no value.
static ABSENT: Value = Value::Null;

/// A record holding values for the fields declared by `T` and its ancestors.
///
/// Only present values are stored; a field is either set to a non-null value
/// or unset.
pub struct Config<T: ConfigType> {
    entry: Arc<TypeEntry>,
    values: Options,
    _type: PhantomData<fn() -> T>,
}

impl<T: ConfigType> Config<T> {
    /// Create an empty record, resolving the type's fields on first use.
    pub fn new() -> Self {
        Self {
            entry: registry::resolve::<T>(),
            values: Options::new(),
            _type: PhantomData,
        }
    }

    /// Build, update and validate a record from untyped options in one call.
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let mut config = Self::new();
        config.update(options);
        config.apply()?;
        Ok(config)
    }

    /// Name of the concrete record type.
    pub fn type_name(&self) -> &'static str {
        self.entry.name
    }

    /// Every field of the type, inherited fields first.
    pub fn fields(&self) -> &[&'static str] {
        &self.entry.fields
    }

    /// Current value of a field, or `None` when unset or undeclared.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Set fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        let mut emitted = Vec::with_capacity(self.values.len());
        self.entry.fields.iter().filter_map(move |&field| {
            if emitted.contains(&field) {
                return None;
            }
            let value = self.values.get(field)?;
            emitted.push(field);
            Some((field, value))
        })
    }

    /// Map of the fields currently holding a value, in declaration order.
    ///
    /// Unset fields are left out rather than written as `null`, so the schema
    /// engine can tell an omitted field from one the caller supplied.
    pub fn to_map(&self) -> Options {
        self.iter()
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect()
    }

    /// Copy present values for declared fields out of `options`.
    ///
    /// Missing keys and `null` values leave the field as it was; keys that are
    /// not declared fields are ignored.
    pub fn update(&mut self, options: &Options) {
        let mut assigned = 0usize;
        for &field in &self.entry.fields {
            match options.get(field) {
                Some(value) if is_present(value) => {
                    self.values.insert(field.to_string(), value.clone());
                    assigned += 1;
                }
                _ => {}
            }
        }
        debug!(
            "updated config (type={}, assigned={}, offered={})",
            self.entry.name,
            assigned,
            options.len()
        );
    }

    /// Validate the record against its schema and merge the normalized result.
    ///
    /// Validation runs on a snapshot; a rejected record is left unchanged.
    pub fn apply(&mut self) -> Result<(), ConfigError> {
        let candidate = self.to_map();
        match self.entry.schema.validate(&candidate) {
            Ok(normalized) => {
                debug!(
                    "config validated (type={}, fields={})",
                    self.entry.name,
                    normalized.len()
                );
                self.update(&normalized);
                Ok(())
            }
            Err(failure) => {
                debug!(
                    "config rejected (type={}, reasons={})",
                    self.entry.name,
                    failure.reasons().len()
                );
                Err(failure.into())
            }
        }
    }

    /// Decode the set fields into a typed view.
    pub fn deserialize<S: DeserializeOwned>(&self) -> Result<S, ConfigError> {
        Ok(serde_json::from_value(Value::Object(self.to_map()))?)
    }
}

impl<T: ConfigType> Default for Config<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ConfigType> Clone for Config<T> {
    fn clone(&self) -> Self {
        Self {
            entry: Arc::clone(&self.entry),
            values: self.values.clone(),
            _type: PhantomData,
        }
    }
}

impl<T: ConfigType> PartialEq for Config<T> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<T: ConfigType> fmt::Debug for Config<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("type", &self.entry.name)
            .field("values", &self.values)
            .finish()
    }
}

impl<T: ConfigType> Index<&str> for Config<T> {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        self.get(name).unwrap_or(&ABSENT)
    }
}

impl<T: ConfigType> Serialize for Config<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
