//! Row extraction: evaluating descriptors against a record.

use crate::column::{Descriptor, RowContext, Rule};
use crate::error::{CommaError, Result};
use crate::registry::Configuration;
use crate::traits::{Commable, Nested};
use crate::value::Value;

/// Cells of `record` under `configuration`, groups flattened.
///
/// Values are returned as produced; no conversion to text happens here.
/// Fails on the first accessor the record does not have.
pub fn row_for(configuration: &Configuration, record: &dyn Commable) -> Result<Vec<Value>> {
    let mut cells = Vec::with_capacity(configuration.width());
    extract(configuration.descriptors(), Some(record), &mut cells)?;
    Ok(cells)
}

/// Appends the cells of `descriptors` to `out`.
///
/// `record` is `None` inside a group whose nested record is absent; every
/// leaf then yields [`Value::Null`].
fn extract(
    descriptors: &[Descriptor],
    record: Option<&dyn Commable>,
    out: &mut Vec<Value>,
) -> Result<()> {
    let start = out.len();
    for descriptor in descriptors {
        if let Rule::Group { via, children } = &descriptor.rule {
            let target = match (record, via) {
                (Some(rec), Some(name)) => match rec.nested(name) {
                    Some(Nested::Record(inner)) => Some(inner),
                    Some(Nested::Absent) => None,
                    None => return Err(unknown_accessor(rec, name)),
                },
                (rec, _) => rec,
            };
            extract(children, target, out)?;
            continue;
        }

        let Some(rec) = record else {
            out.push(Value::Null);
            continue;
        };

        let value = evaluate(descriptor, rec, &RowContext::new(&out[start..]))?;
        out.push(value);
    }
    Ok(())
}

fn evaluate(descriptor: &Descriptor, record: &dyn Commable, ctx: &RowContext<'_>) -> Result<Value> {
    let value = match &descriptor.rule {
        Rule::Named(name) => record
            .field(name)
            .ok_or_else(|| unknown_accessor(record, name))?,
        Rule::Static(value) => value.clone(),
        Rule::Computed(block) => block(record, ctx)?,
        Rule::Group { .. } => unreachable!("groups are expanded by the caller"),
    };
    Ok(match &descriptor.transform {
        Some(transform) => transform(value),
        None => value,
    })
}

fn unknown_accessor(record: &dyn Commable, name: &str) -> CommaError {
    CommaError::UnknownAccessor {
        type_name: record.record_name().to_string(),
        accessor: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Column, Columns, Group};

    struct Isbn {
        number_10: String,
    }

    impl Commable for Isbn {
        fn field(&self, name: &str) -> Option<Value> {
            (name == "number_10").then(|| Value::from(&self.number_10))
        }
    }

    struct Book {
        title: String,
        pages: u32,
        isbn: Option<Isbn>,
    }

    impl Commable for Book {
        fn field(&self, name: &str) -> Option<Value> {
            match name {
                "title" => Some(Value::from(&self.title)),
                "pages" => Some(Value::from(self.pages)),
                _ => None,
            }
        }

        fn nested(&self, name: &str) -> Option<Nested<'_>> {
            match name {
                "isbn" => Some(match &self.isbn {
                    Some(isbn) => Nested::Record(isbn),
                    None => Nested::Absent,
                }),
                _ => None,
            }
        }
    }

    fn book(isbn: Option<&str>) -> Book {
        Book {
            title: "Smalltalk-80".to_string(),
            pages: 714,
            isbn: isbn.map(|n| Isbn {
                number_10: n.to_string(),
            }),
        }
    }

    fn configuration(build: impl FnOnce(&mut Columns<'_, Book>)) -> Configuration {
        let mut columns = Columns::<Book>::new(None);
        build(&mut columns);
        Configuration::new(columns.finish().unwrap())
    }

    #[test]
    fn named_static_and_computed() {
        let config = configuration(|c| {
            c.column("title");
            c.column(Column::fixed("static"));
            c.column(Column::computed(|b: &Book| b.pages * 2));
            c.column(Column::<Book>::blank());
        });
        let row = row_for(&config, &book(None)).unwrap();
        assert_eq!(
            row,
            vec![
                Value::from("Smalltalk-80"),
                Value::from("static"),
                Value::from(1428u32),
                Value::Null,
            ]
        );
    }

    #[test]
    fn values_are_not_stringified() {
        let config = configuration(|c| {
            c.column("pages");
        });
        let row = row_for(&config, &book(None)).unwrap();
        assert_eq!(row, vec![Value::from(714u32)]);
    }

    #[test]
    fn transform_applies_to_rule_value() {
        let config = configuration(|c| {
            c.column(Column::named("title").map(|v: Value| v.to_string().to_uppercase()));
        });
        let row = row_for(&config, &book(None)).unwrap();
        assert_eq!(row, vec![Value::from("SMALLTALK-80")]);
    }

    #[test]
    fn unknown_accessor_fails() {
        let config = configuration(|c| {
            c.column("title").column("author");
        });
        match row_for(&config, &book(None)) {
            Err(CommaError::UnknownAccessor { accessor, type_name }) => {
                assert_eq!(accessor, "author");
                assert!(type_name.ends_with("Book"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn nested_group_reads_sub_record() {
        let config = configuration(|c| {
            c.column("title");
            c.group(Group::at("isbn"), |g: &mut Columns<'_, Isbn>| {
                g.column("number_10");
                g.column(Column::computed(|i: &Isbn| i.number_10.len()));
            });
        });
        let row = row_for(&config, &book(Some("123123123"))).unwrap();
        assert_eq!(
            row,
            vec![
                Value::from("Smalltalk-80"),
                Value::from("123123123"),
                Value::from(9usize),
            ]
        );
    }

    #[test]
    fn absent_nested_record_yields_nulls() {
        let config = configuration(|c| {
            c.group(Group::at("isbn"), |g: &mut Columns<'_, Isbn>| {
                g.column("number_10").column(Column::fixed("x"));
            });
            c.column("pages");
        });
        let row = row_for(&config, &book(None)).unwrap();
        assert_eq!(row, vec![Value::Null, Value::Null, Value::from(714u32)]);
    }

    #[test]
    fn unknown_group_accessor_fails() {
        let config = configuration(|c| {
            c.group(Group::<Book>::at("publisher"), |g| {
                g.column("title");
            });
        });
        assert!(matches!(
            row_for(&config, &book(None)),
            Err(CommaError::UnknownAccessor { .. })
        ));
    }

    #[test]
    fn computed_with_sees_group_cells() {
        let config = configuration(|c| {
            c.column("title");
            c.group(Group::<Book>::inline(), |g| {
                g.column("pages");
                g.column(Column::computed_with(|_: &Book, ctx| {
                    format!("{} cells before", ctx.len())
                }));
            });
            c.column(Column::computed_with(|_: &Book, ctx| {
                ctx.cells().len()
            }));
        });
        let row = row_for(&config, &book(None)).unwrap();
        assert_eq!(
            row,
            vec![
                Value::from("Smalltalk-80"),
                Value::from(714u32),
                Value::from("1 cells before"),
                Value::from(3usize),
            ]
        );
    }

    #[test]
    fn block_for_other_type_is_incompatible() {
        let config = configuration(|c| {
            c.group(Group::<Isbn>::inline(), |g| {
                g.column(Column::computed(|i: &Isbn| i.number_10.clone()));
            });
        });
        assert!(matches!(
            row_for(&config, &book(None)),
            Err(CommaError::IncompatibleRecord { .. })
        ));
    }

    #[test]
    fn row_width_matches_configuration() {
        let config = configuration(|c| {
            c.column("title");
            c.group(Group::at("isbn"), |g: &mut Columns<'_, Isbn>| {
                g.column("number_10").column(Column::<Isbn>::blank());
            });
        });
        let row = row_for(&config, &book(Some("1"))).unwrap();
        assert_eq!(row.len(), config.width());
        assert_eq!(row.len(), crate::header::headers_for(&config).len());
    }
}
