//! Configuration registry keyed by record type and style.
//!
//! A [`Registry`] maps `(type, style)` to a [`Configuration`], the ordered
//! list of column descriptors declared for that pair. Configurations are
//! declared once at startup with [`Registry::define`] and only read
//! afterwards.
//!
//! # Style resolution
//!
//! [`Registry::lookup`] walks the record's lineage (the type, then the record
//! it extends, and so on) and uses the first type that declared any
//! configuration. On that type:
//!
//! - a named style must exist, otherwise the lookup fails;
//! - [`Style::Default`] resolves to the default configuration if declared,
//!   or else to the first configuration the type declared.
//!
//! # Process-wide registry
//!
//! [`global`] returns a lock-protected registry shared by the whole process,
//! used by the [`define`], [`render`], [`headers`] and [`row`] shortcuts.
//! Render calls only hold the read lock while resolving the configuration.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer};

use crate::column::{Columns, Descriptor};
use crate::error::{CommaError, Result};
use crate::render::{RenderOptions, Renderer};
use crate::traits::{Commable, TypeKey};
use crate::value::Value;

/// Name of a configuration declared for a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Style {
    /// The unnamed default configuration.
    #[default]
    Default,
    /// A named alternative configuration.
    Named(String),
}

impl Style {
    /// Creates a style from a name. `""` and `"default"` map to
    /// [`Style::Default`].
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() || name == "default" {
            Style::Default
        } else {
            Style::Named(name)
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Style::Default)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Default => f.write_str("default"),
            Style::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for Style {
    fn from(name: &str) -> Self {
        Style::named(name)
    }
}

impl From<String> for Style {
    fn from(name: String) -> Self {
        Style::named(name)
    }
}

impl From<&Style> for Style {
    fn from(style: &Style) -> Self {
        style.clone()
    }
}

impl<'de> Deserialize<'de> for Style {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Option::<String>::deserialize(deserializer).map(|name| Style::named(name.unwrap_or_default()))
    }
}

/// An ordered, shareable list of column descriptors.
#[derive(Debug, Clone)]
pub struct Configuration {
    descriptors: Arc<[Descriptor]>,
}

impl Configuration {
    pub(crate) fn new(descriptors: Vec<Descriptor>) -> Self {
        Configuration {
            descriptors: descriptors.into(),
        }
    }

    /// Top-level descriptors in declaration order.
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Number of cells per row, with groups flattened.
    pub fn width(&self) -> usize {
        self.descriptors.iter().map(Descriptor::width).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Styles declared for one type, in declaration order.
#[derive(Debug, Default)]
struct StyleTable {
    entries: Vec<(Style, Configuration)>,
}

impl StyleTable {
    fn insert(&mut self, style: Style, configuration: Configuration) -> bool {
        match self.entries.iter_mut().find(|(s, _)| *s == style) {
            Some(entry) => {
                entry.1 = configuration;
                true
            }
            None => {
                self.entries.push((style, configuration));
                false
            }
        }
    }

    fn get(&self, style: &Style) -> Option<&Configuration> {
        let exact = self.entries.iter().find(|(s, _)| s == style);
        match (exact, style) {
            (Some((_, configuration)), _) => Some(configuration),
            (None, Style::Default) => self.entries.first().map(|(_, c)| c),
            (None, Style::Named(_)) => None,
        }
    }
}

/// Mapping from `(type, style)` to declared configurations.
///
/// # Example
///
/// ```rust
/// use comma::{Column, Commable, Registry, RenderOptions, Style, Value};
///
/// struct User { first_name: String, last_name: String }
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
/// let mut registry = Registry::new();
/// registry.define::<User>(Style::Default, |c| {
///     c.column("first_name");
///     c.column("last_name");
///     c.column(
///         Column::computed(|u: &User| format!("{} {}", u.first_name, u.last_name))
///             .label("Name"),
///     );
/// }).unwrap();
///
/// let users = vec![User { first_name: "Fred".into(), last_name: "Flintstone".into() }];
/// let csv = registry.render(&users, Style::Default, &RenderOptions::default()).unwrap();
/// assert_eq!(csv, "First name,Last name,Name\nFred,Flintstone,Fred Flintstone\n");
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    types: HashMap<TypeKey, StyleTable>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Declares the configuration of `T` for `style`.
    ///
    /// `build` receives a [`Columns`] collector. Redefining an existing
    /// `(T, style)` replaces the previous configuration. Declaration errors
    /// (a column with more than one evaluation rule, an `include` of a
    /// missing style) are returned here and leave the registry unchanged.
    pub fn define<T: Commable>(
        &mut self,
        style: impl Into<Style>,
        build: impl for<'r> FnOnce(&mut Columns<'r, T>),
    ) -> Result<()> {
        let style = style.into();
        let descriptors = {
            let mut columns = Columns::<T>::new(Some(&*self));
            build(&mut columns);
            columns.finish()?
        };
        let configuration = Configuration::new(descriptors);
        let width = configuration.width();
        let key = TypeKey::of::<T>();
        let replaced = self
            .types
            .entry(key)
            .or_default()
            .insert(style.clone(), configuration);
        tracing::debug!(
            record = key.name(),
            %style,
            columns = width,
            replaced,
            "defined column configuration"
        );
        Ok(())
    }

    /// Resolves the configuration for `T` and `style`.
    pub fn lookup<T: Commable>(&self, style: &Style) -> Result<Configuration> {
        self.lookup_lineage(&T::lineage(), style)
    }

    /// Resolves a configuration from an explicit lineage, nearest type first.
    pub fn lookup_lineage(&self, lineage: &[TypeKey], style: &Style) -> Result<Configuration> {
        let not_found = || CommaError::ConfigurationNotFound {
            type_name: lineage
                .first()
                .map(|key| key.name().to_string())
                .unwrap_or_default(),
            style: style.to_string(),
        };

        let (key, table) = lineage
            .iter()
            .find_map(|key| self.types.get(key).map(|table| (key, table)))
            .ok_or_else(not_found)?;

        let configuration = table.get(style).ok_or_else(not_found)?;
        tracing::trace!(
            record = lineage.first().map(|k| k.name()).unwrap_or_default(),
            resolved = key.name(),
            %style,
            "resolved column configuration"
        );
        Ok(configuration.clone())
    }

    /// Styles declared directly on `T`, in declaration order.
    pub fn styles<T: Commable>(&self) -> Vec<Style> {
        self.types
            .get(&TypeKey::of::<T>())
            .map(|table| table.entries.iter().map(|(s, _)| s.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns `true` if `T` declared any configuration of its own.
    pub fn is_defined<T: Commable>(&self) -> bool {
        self.types.contains_key(&TypeKey::of::<T>())
    }

    /// Header row for `T` in `style`.
    pub fn headers<T: Commable>(&self, style: impl Into<Style>) -> Result<Vec<String>> {
        let configuration = self.lookup::<T>(&style.into())?;
        Ok(crate::header::headers_for(&configuration))
    }

    /// Cells of one record in `style`.
    pub fn row<T: Commable>(&self, item: &T, style: impl Into<Style>) -> Result<Vec<Value>> {
        let configuration = self.lookup::<T>(&style.into())?;
        crate::row::row_for(&configuration, item)
    }

    /// Renders `items` as CSV text.
    ///
    /// Shortcut for [`Renderer::new(self).render(..)`](Renderer::render).
    pub fn render<'i, T, I>(
        &self,
        items: I,
        style: impl Into<Style>,
        options: &RenderOptions,
    ) -> Result<String>
    where
        T: Commable,
        I: IntoIterator<Item = &'i T>,
    {
        Renderer::new(self).render(items, style, options)
    }
}

static GLOBAL: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::new()));

/// The process-wide registry used by the free-function shortcuts.
pub fn global() -> RwLockReadGuard<'static, Registry> {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write access to the process-wide registry.
pub fn global_mut() -> RwLockWriteGuard<'static, Registry> {
    GLOBAL.write().unwrap_or_else(PoisonError::into_inner)
}

/// Declares a configuration in the process-wide registry.
///
/// Must not be called from inside another `define` closure on the
/// process-wide registry, which holds the write lock while it runs.
pub fn define<T: Commable>(
    style: impl Into<Style>,
    build: impl for<'r> FnOnce(&mut Columns<'r, T>),
) -> Result<()> {
    global_mut().define::<T>(style, build)
}

fn global_lookup<T: Commable>(style: &Style) -> Result<Configuration> {
    global().lookup::<T>(style)
}

/// Header row for `T` from the process-wide registry.
pub fn headers<T: Commable>(style: impl Into<Style>) -> Result<Vec<String>> {
    let configuration = global_lookup::<T>(&style.into())?;
    Ok(crate::header::headers_for(&configuration))
}

/// Cells of one record from the process-wide registry.
pub fn row<T: Commable>(item: &T, style: impl Into<Style>) -> Result<Vec<Value>> {
    let configuration = global_lookup::<T>(&style.into())?;
    crate::row::row_for(&configuration, item)
}

/// Renders `items` as CSV text using the process-wide registry.
pub fn render<'i, T, I>(items: I, style: impl Into<Style>, options: &RenderOptions) -> Result<String>
where
    T: Commable,
    I: IntoIterator<Item = &'i T>,
{
    let style = style.into();
    let configuration = global_lookup::<T>(&style)?;
    crate::render::render_configuration(&configuration, &style, items, options, &crate::CsvWriter)
}
