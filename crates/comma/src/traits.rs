//! The record capability the engine evaluates columns against.
//!
//! This module provides the [`Commable`] trait which is implemented by
//! the `#[derive(Commable)]` macro to give the engine name-based access to a
//! type's fields, nested records and parent record.

use std::any::{Any, TypeId};
use std::fmt;

use crate::value::Value;

/// Identity of a record type in the configuration registry.
///
/// Wraps the [`TypeId`] used for keying together with the type name, which
/// only serves diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The type's name as reported by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Upcast to [`Any`] for every `'static` type.
///
/// Supertrait of [`Commable`] so that computed blocks typed for a concrete
/// record can be handed a `&dyn Commable` and recover the concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Result of resolving a nested record by name.
#[derive(Clone, Copy)]
pub enum Nested<'a> {
    /// The nested record is present.
    Record(&'a dyn Commable),
    /// The accessor exists but holds no record (an empty `Option`).
    Absent,
}

impl fmt::Debug for Nested<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nested::Record(_) => f.write_str("Nested::Record(..)"),
            Nested::Absent => f.write_str("Nested::Absent"),
        }
    }
}

/// Trait for types whose instances can be rendered as table rows.
///
/// This trait is typically derived using `#[derive(Commable)]`, but can also
/// be implemented manually.
///
/// # Manual Implementation
///
/// ```
/// use comma::{Commable, Value};
///
/// struct User {
///     first_name: String,
///     last_name: String,
/// }
///
/// impl Commable for User {
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "first_name" => Some(Value::from(&self.first_name)),
///             "last_name" => Some(Value::from(&self.last_name)),
///             _ => None,
///         }
///     }
/// }
///
/// let user = User { first_name: "Fred".into(), last_name: "Flintstone".into() };
/// assert_eq!(user.field("first_name"), Some(Value::from("Fred")));
/// assert_eq!(user.field("age"), None);
/// ```
///
/// # Extending another record
///
/// A type that wraps a parent record (the composition form of subclassing)
/// overrides [`lineage`](Commable::lineage) and
/// [`ancestor`](Commable::ancestor). The registry then falls back to the
/// parent's configuration when the type has none of its own, and computed
/// blocks declared for the parent receive the wrapped parent.
pub trait Commable: AsAny + Send + Sync + 'static {
    /// Returns the value behind a named accessor.
    ///
    /// `None` means the accessor does not exist on this type, which the row
    /// extractor reports as [`CommaError::UnknownAccessor`]. A field that
    /// exists but holds nothing should return `Some(Value::Null)`.
    ///
    /// [`CommaError::UnknownAccessor`]: crate::CommaError::UnknownAccessor
    fn field(&self, name: &str) -> Option<Value>;

    /// Returns the nested record behind a named accessor, for groups that
    /// descend into a sub-object.
    fn nested(&self, name: &str) -> Option<Nested<'_>> {
        let _ = name;
        None
    }

    /// Returns the parent record this instance extends, if any.
    fn ancestor(&self) -> Option<&dyn Commable> {
        None
    }

    /// Name of the concrete type, for error messages.
    fn record_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Type keys from this type to its furthest ancestor, nearest first.
    fn lineage() -> Vec<TypeKey>
    where
        Self: Sized,
    {
        vec![TypeKey::of::<Self>()]
    }
}

/// Views a record as the concrete type `T`, walking up its ancestors.
///
/// Returns `None` when neither the record nor any ancestor is a `T`.
pub fn view_as<T: Commable>(record: &dyn Commable) -> Option<&T> {
    let mut current = Some(record);
    while let Some(rec) = current {
        if let Some(found) = rec.as_any().downcast_ref::<T>() {
            return Some(found);
        }
        current = rec.ancestor();
    }
    None
}
