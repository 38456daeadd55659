//! Column descriptors and the declaration builder.
//!
//! A configuration is declared by handing a closure to
//! [`Registry::define`](crate::Registry::define). The closure receives a
//! [`Columns`] collector and adds [`Column`]s and [`Group`]s to it in order:
//!
//! ```rust
//! use comma::{Column, Commable, Group, Registry, Style, Value};
//!
//! struct Isbn { number_10: String }
//! struct Book { title: String, isbn: Isbn }
//!
//! impl Commable for Isbn {
//!     fn field(&self, name: &str) -> Option<Value> {
//!         (name == "number_10").then(|| Value::from(&self.number_10))
//!     }
//! }
//!
//! impl Commable for Book {
//!     fn field(&self, name: &str) -> Option<Value> {
//!         (name == "title").then(|| Value::from(&self.title))
//!     }
//!     fn nested(&self, name: &str) -> Option<comma::Nested<'_>> {
//!         (name == "isbn").then(|| comma::Nested::Record(&self.isbn))
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry
//!     .define::<Book>(Style::Default, |c| {
//!         c.column(Column::named("title").label("Title"));
//!         c.column(Column::computed(|b: &Book| b.title.len()).label("Length"));
//!         c.group(Group::at("isbn"), |g: &mut comma::Columns<'_, Isbn>| {
//!             g.column(Column::named("number_10").label("ISBN-10"));
//!         });
//!     })
//!     .unwrap();
//! ```
//!
//! Each column carries at most one evaluation rule: a named accessor, a
//! static value or a computed block. A column with none is a static column
//! holding [`Value::Null`]. Adding a second rule is reported when the
//! configuration is defined, never at render time.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{CommaError, Result};
use crate::registry::{Registry, Style};
use crate::traits::{view_as, Commable};
use crate::value::Value;

pub(crate) type Block = Arc<dyn Fn(&dyn Commable, &RowContext<'_>) -> Result<Value> + Send + Sync>;
pub(crate) type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Header override for a column or group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// Used verbatim as the header.
    Text(String),
    /// Identifier-like value, humanized into the header.
    Symbol(String),
}

impl Label {
    /// Builds a symbol label from anything displayable.
    pub fn symbol(value: impl fmt::Display) -> Self {
        Label::Symbol(value.to_string())
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Text(s)
    }
}

/// Cells already produced in the enclosing group while a row is extracted.
///
/// Handed to blocks declared with [`Column::computed_with`], so a column can
/// derive its value from the columns to its left.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    cells: &'a [Value],
}

impl<'a> RowContext<'a> {
    pub(crate) fn new(cells: &'a [Value]) -> Self {
        RowContext { cells }
    }

    /// All cells produced so far in the current group, in column order.
    pub fn cells(&self) -> &'a [Value] {
        self.cells
    }

    /// The cell at `index` within the current group.
    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.cells.get(index)
    }

    /// The most recently produced cell.
    pub fn last(&self) -> Option<&'a Value> {
        self.cells.last()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// How a descriptor produces its cell(s).
#[derive(Clone)]
pub(crate) enum Rule {
    Named(String),
    Static(Value),
    Computed(Block),
    Group {
        via: Option<String>,
        children: Vec<Descriptor>,
    },
}

impl Rule {
    fn describe(&self) -> String {
        match self {
            Rule::Named(name) => format!("accessor '{}'", name),
            Rule::Static(_) => "static value".to_string(),
            Rule::Computed(_) => "block".to_string(),
            Rule::Group { .. } => "group".to_string(),
        }
    }
}

/// An immutable, type-erased column extraction rule.
///
/// Produced from a [`Column`] or [`Group`] when a configuration is defined.
#[derive(Clone)]
pub struct Descriptor {
    pub(crate) rule: Rule,
    pub(crate) label: Option<Label>,
    pub(crate) transform: Option<Transform>,
}

impl Descriptor {
    /// The header override, if one was declared.
    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    /// The accessor name for named columns and nested groups.
    pub fn accessor_name(&self) -> Option<&str> {
        match &self.rule {
            Rule::Named(name) => Some(name),
            Rule::Group { via, .. } => via.as_deref(),
            _ => None,
        }
    }

    /// Child descriptors, if this descriptor is a group.
    pub fn children(&self) -> Option<&[Descriptor]> {
        match &self.rule {
            Rule::Group { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.rule, Rule::Group { .. })
    }

    /// Number of cells this descriptor contributes to a row.
    pub fn width(&self) -> usize {
        match &self.rule {
            Rule::Group { children, .. } => children.iter().map(Descriptor::width).sum(),
            _ => 1,
        }
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Descriptor");
        s.field("rule", &self.rule.describe());
        s.field("label", &self.label);
        if let Rule::Group { children, .. } = &self.rule {
            s.field("children", children);
        }
        s.finish()
    }
}

/// Declaration of a single column for records of type `T`.
pub struct Column<T> {
    rules: Vec<Rule>,
    label: Option<Label>,
    transform: Option<Transform>,
    _record: PhantomData<fn(&T)>,
}

impl<T: Commable> Column<T> {
    /// A column with no evaluation rule yet.
    ///
    /// Left as is, it is a static column holding [`Value::Null`] with an
    /// empty header.
    pub fn blank() -> Self {
        Column {
            rules: Vec::new(),
            label: None,
            transform: None,
            _record: PhantomData,
        }
    }

    /// A column reading the named accessor of each record.
    pub fn named(name: impl Into<String>) -> Self {
        Self::blank().accessor(name)
    }

    /// A column holding the same value in every row.
    pub fn fixed(value: impl Into<Value>) -> Self {
        Self::blank().value(value)
    }

    /// A column computed from each record.
    pub fn computed<F, V>(block: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self::blank().block(block)
    }

    /// A column computed from each record and the cells produced before it
    /// in the enclosing group.
    pub fn computed_with<F, V>(block: F) -> Self
    where
        F: Fn(&T, &RowContext<'_>) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self::blank().block_with(block)
    }

    /// Adds a named accessor rule.
    pub fn accessor(mut self, name: impl Into<String>) -> Self {
        self.rules.push(Rule::Named(name.into()));
        self
    }

    /// Adds a static value rule.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.rules.push(Rule::Static(value.into()));
        self
    }

    /// Adds a computed block rule.
    pub fn block<F, V>(self, block: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.block_with(move |record: &T, _: &RowContext<'_>| block(record))
    }

    /// Adds a computed block rule that also sees the group's cells so far.
    pub fn block_with<F, V>(mut self, block: F) -> Self
    where
        F: Fn(&T, &RowContext<'_>) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        let erased: Block = Arc::new(move |record: &dyn Commable, ctx: &RowContext<'_>| -> Result<Value> {
            let typed = view_as::<T>(record).ok_or_else(|| CommaError::IncompatibleRecord {
                expected: std::any::type_name::<T>(),
                actual: record.record_name(),
            })?;
            Ok(block(typed, ctx).into())
        });
        self.rules.push(Rule::Computed(erased));
        self
    }

    /// Sets a header used verbatim.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(Label::Text(label.into()));
        self
    }

    /// Sets an identifier-like header that gets humanized.
    pub fn symbol(mut self, symbol: impl fmt::Display) -> Self {
        self.label = Some(Label::symbol(symbol));
        self
    }

    /// Transforms the value produced by the column's rule.
    pub fn map<F, V>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.transform = Some(Arc::new(move |value: Value| -> Value { transform(value).into() }));
        self
    }

    fn build(self) -> Result<Descriptor> {
        let mut rules = self.rules;
        if rules.len() > 1 {
            let described: Vec<String> = rules.iter().map(Rule::describe).collect();
            return Err(CommaError::MalformedColumn {
                type_name: std::any::type_name::<T>().to_string(),
                rules: described.join(", "),
            });
        }
        let rule = rules.pop().unwrap_or(Rule::Static(Value::Null));
        Ok(Descriptor {
            rule,
            label: self.label,
            transform: self.transform,
        })
    }
}

impl<T: Commable> Default for Column<T> {
    fn default() -> Self {
        Self::blank()
    }
}

impl<T: Commable> From<&str> for Column<T> {
    fn from(name: &str) -> Self {
        Column::named(name)
    }
}

impl<T: Commable> From<String> for Column<T> {
    fn from(name: String) -> Self {
        Column::named(name)
    }
}

/// Declaration of a group of columns over records of type `S`.
///
/// [`Group::at`] descends into the nested record behind an accessor;
/// [`Group::inline`] evaluates its children against the same record.
pub struct Group<S> {
    via: Option<String>,
    label: Option<Label>,
    _record: PhantomData<fn(&S)>,
}

impl<S: Commable> Group<S> {
    /// A group over the nested record behind `accessor`.
    pub fn at(accessor: impl Into<String>) -> Self {
        Group {
            via: Some(accessor.into()),
            label: None,
            _record: PhantomData,
        }
    }

    /// A group over the record itself.
    pub fn inline() -> Self {
        Group {
            via: None,
            label: None,
            _record: PhantomData,
        }
    }

    /// Prefixes every child header with `label`.
    ///
    /// This is an extension: an unlabeled group adds nothing to the header
    /// row, and its children carry their own labels
    /// (`Column::named("number_10").label("ISBN-10")`). A labeled group
    /// turns `First name` into `Author First name`, and a child with an
    /// empty header into just `Author`.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(Label::Text(label.into()));
        self
    }

    /// Prefixes every child header with the humanized `symbol`, as
    /// [`Group::label`] does.
    pub fn symbol(mut self, symbol: impl fmt::Display) -> Self {
        self.label = Some(Label::symbol(symbol));
        self
    }
}

/// Collector handed to configuration closures.
///
/// Declarations are recorded in call order. The first declaration error is
/// kept and returned by [`Registry::define`]; later calls are still accepted
/// so the closure does not need to handle errors itself.
pub struct Columns<'r, T> {
    registry: Option<&'r Registry>,
    descriptors: Vec<Descriptor>,
    error: Option<CommaError>,
    _record: PhantomData<fn(&T)>,
}

impl<'r, T: Commable> Columns<'r, T> {
    pub(crate) fn new(registry: Option<&'r Registry>) -> Self {
        Columns {
            registry,
            descriptors: Vec::new(),
            error: None,
            _record: PhantomData,
        }
    }

    /// Declares a column.
    ///
    /// Accepts a [`Column`] or, as a shorthand for [`Column::named`], an
    /// accessor name.
    pub fn column(&mut self, column: impl Into<Column<T>>) -> &mut Self {
        match column.into().build() {
            Ok(descriptor) => self.descriptors.push(descriptor),
            Err(err) => self.fail(err),
        }
        self
    }

    /// Declares a group whose children are built by `build`.
    pub fn group<S, F>(&mut self, group: Group<S>, build: F) -> &mut Self
    where
        S: Commable,
        F: FnOnce(&mut Columns<'r, S>),
    {
        let mut children = Columns::<S>::new(self.registry);
        build(&mut children);
        match children.finish() {
            Ok(children) => self.descriptors.push(Descriptor {
                rule: Rule::Group {
                    via: group.via,
                    children,
                },
                label: group.label,
                transform: None,
            }),
            Err(err) => self.fail(err),
        }
        self
    }

    /// Splices in the columns of an already defined style of `T`.
    pub fn include(&mut self, style: impl Into<Style>) -> &mut Self {
        let style = style.into();
        let found = match self.registry {
            Some(registry) => registry.lookup::<T>(&style),
            None => Err(CommaError::ConfigurationNotFound {
                type_name: std::any::type_name::<T>().to_string(),
                style: style.to_string(),
            }),
        };
        match found {
            Ok(configuration) => self
                .descriptors
                .extend(configuration.descriptors().iter().cloned()),
            Err(err) => self.fail(err),
        }
        self
    }

    fn fail(&mut self, err: CommaError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub(crate) fn finish(self) -> Result<Vec<Descriptor>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.descriptors),
        }
    }
}
