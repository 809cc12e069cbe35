//! Type declarations and the process-wide table of resolved record types.
//!
//! Each record type lists only the fields it adds; [`ConfigType::parent`]
//! links it to the type it extends. The first record built for a type walks
//! that chain once, flattens it base-first and stores the result here, so all
//! later records of the type share the same field list and schema engine.

use crate::SchemaEngine;
use log::{debug, warn};
use parking_lot::RwLock;
use std::any::TypeId;
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Declares a configuration record type.
///
/// ```ignore
/// struct Service;
///
/// impl ConfigType for Service {
///     type Schema = NoSchema;
///     const FIELDS: &'static [&'static str] = &["name"];
///
///     fn schema() -> NoSchema {
///         NoSchema
///     }
/// }
/// ```
///
/// Each field name must be declared exactly once across an extends chain.
pub trait ConfigType: 'static {
    /// Engine validating records of this type.
    type Schema: SchemaEngine + 'static;

    /// Fields this type adds on top of its parent.
    const FIELDS: &'static [&'static str];

    /// Type this one extends, if any.
    fn parent() -> Option<TypeDecl> {
        None
    }

    /// Build the schema for this type, usually by extending the parent's.
    ///
    /// Called once per type while the type table is locked. Records built
    /// from inside `schema()` get an uncached entry and a warning.
    fn schema() -> Self::Schema;

    /// Name used in logs and diagnostics: the type's own path segment plus any
    /// generic arguments, e.g. `Wrapper<my_app::Inner>`.
    fn type_name() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Drop the module path in front of a type name, keeping generic arguments.
fn short_type_name(full: &'static str) -> &'static str {
    let generics = full.find('<').unwrap_or(full.len());
    let start = full[..generics].rfind("::").map_or(0, |idx| idx + 2);
    &full[start..]
}

/// Static description of one link in an extends chain.
#[derive(Clone, Copy)]
pub struct TypeDecl {
    id: fn() -> TypeId,
    name: fn() -> &'static str,
    fields: &'static [&'static str],
    parent: fn() -> Option<TypeDecl>,
}

impl TypeDecl {
    /// Describe a declared record type, typically to return from `parent()`.
    pub fn of<T: ConfigType>() -> Self {
        Self {
            id: TypeId::of::<T>,
            name: T::type_name,
            fields: T::FIELDS,
            parent: T::parent,
        }
    }

    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    /// Fields declared by this link alone.
    pub fn own_fields(&self) -> &'static [&'static str] {
        self.fields
    }

    fn type_id(&self) -> TypeId {
        (self.id)()
    }

    fn parent(&self) -> Option<TypeDecl> {
        (self.parent)()
    }
}

impl fmt::Debug for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDecl")
            .field("name", &self.name())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Resolved metadata shared by every record of one type.
pub(crate) struct TypeEntry {
    pub(crate) name: &'static str,
    pub(crate) fields: Vec<&'static str>,
    pub(crate) schema: Box<dyn SchemaEngine>,
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct TypeTable {
    entries: HashMap<TypeId, Arc<TypeEntry>>,
    /// Type names in the order they were first resolved.
    order: Vec<&'static str>,
}

fn table() -> &'static RwLock<TypeTable> {
    static TABLE: OnceLock<RwLock<TypeTable>> = OnceLock::new();
    TABLE.get_or_init(|| RwLock::new(TypeTable::default()))
}

thread_local! {
    /// Set while this thread holds the table's write lock to build an entry.
    static RESOLVING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as resolving until dropped.
struct ResolvingGuard;

impl ResolvingGuard {
    fn enter() -> Self {
        RESOLVING.with(|flag| flag.set(true));
        ResolvingGuard
    }
}

impl Drop for ResolvingGuard {
    fn drop(&mut self) {
        RESOLVING.with(|flag| flag.set(false));
    }
}

fn build_entry<T: ConfigType>() -> TypeEntry {
    TypeEntry {
        name: T::type_name(),
        fields: flatten(TypeDecl::of::<T>()),
        schema: Box::new(T::schema()),
    }
}

/// Fetch the resolved entry for `T`, resolving it on first use.
pub(crate) fn resolve<T: ConfigType>() -> Arc<TypeEntry> {
    // The write lock is not re-entrant; a record built from inside `schema()`
    // must not touch the table at all.
    if RESOLVING.with(Cell::get) {
        warn!(
            "config type resolved from inside schema(); entry is not cached (name={})",
            T::type_name()
        );
        return Arc::new(build_entry::<T>());
    }

    let id = TypeId::of::<T>();
    if let Some(entry) = table().read().entries.get(&id) {
        return Arc::clone(entry);
    }

    let mut guard = table().write();
    // Another thread may have resolved the type between the two locks.
    if let Some(entry) = guard.entries.get(&id) {
        return Arc::clone(entry);
    }

    let entry = {
        let _resolving = ResolvingGuard::enter();
        Arc::new(build_entry::<T>())
    };
    debug!(
        "resolved config type (name={}, fields={:?})",
        entry.name, entry.fields
    );
    guard.order.push(entry.name);
    guard.entries.insert(id, Arc::clone(&entry));
    entry
}

/// Names of every record type resolved so far, in resolution order.
pub fn registered_types() -> Vec<&'static str> {
    if RESOLVING.with(Cell::get) {
        warn!("registered_types() called from inside schema(); returning nothing");
        return Vec::new();
    }
    table().read().order.clone()
}

/// Flatten an extends chain into base-first field order.
fn flatten(decl: TypeDecl) -> Vec<&'static str> {
    let mut chain = vec![decl];
    let mut seen = HashSet::from([decl.type_id()]);
    let mut cursor = decl.parent();
    while let Some(parent) = cursor {
        if !seen.insert(parent.type_id()) {
            warn!(
                "extends cycle detected (type={}, repeated={})",
                decl.name(),
                parent.name()
            );
            break;
        }
        chain.push(parent);
        cursor = parent.parent();
    }

    let mut fields: Vec<&'static str> = Vec::new();
    for link in chain.iter().rev() {
        for &field in link.fields {
            if fields.contains(&field) {
                warn!(
                    "field declared more than once in extends chain (type={}, field={}, declared_by={})",
                    decl.name(),
                    field,
                    link.name()
                );
            }
            fields.push(field);
        }
    }
    fields
}
