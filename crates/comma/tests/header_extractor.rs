//! Integration tests for header extraction.

use comma::{Column, Columns, Commable, Group, Nested, Registry, Style, Value};

struct Isbn {
    number_10: String,
    number_13: String,
    authority: String,
}

impl Commable for Isbn {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "number_10" => Some(Value::from(&self.number_10)),
            "number_13" => Some(Value::from(&self.number_13)),
            "authority" => Some(Value::from(&self.authority)),
            _ => None,
        }
    }
}

struct Book {
    name: String,
    description: String,
    isbn: Isbn,
}

impl Commable for Book {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::from(&self.name)),
            "description" => Some(Value::from(&self.description)),
            _ => None,
        }
    }

    fn nested(&self, name: &str) -> Option<Nested<'_>> {
        (name == "isbn").then(|| Nested::Record(&self.isbn))
    }
}

struct Row {
    id: u32,
    name: String,
}

impl Commable for Row {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id)),
            "name" => Some(Value::from(&self.name)),
            _ => None,
        }
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .define::<Book>(Style::Default, |c| {
            c.column(Column::named("name").label("Title"));
            c.column("description");
            c.group(Group::at("isbn"), |g: &mut Columns<'_, Isbn>| {
                g.column(Column::named("number_10").label("ISBN-10"));
                g.column(Column::named("number_13").label("ISBN-13"));
                g.column(Column::named("authority").symbol("issuer"));
            });
        })
        .unwrap();
    registry
        .define::<Row>(Style::Default, |c| {
            c.column(Column::blank());
            c.column(Column::fixed("").label("STATIC"));
            c.column(Column::computed(|_: &Row| "").label("STATIC"));
        })
        .unwrap();
    registry
}

fn book() -> Book {
    Book {
        name: "Smalltalk-80".to_string(),
        description: "Language and Implementation".to_string(),
        isbn: Isbn {
            number_10: "123123123".to_string(),
            number_13: "321321321".to_string(),
            authority: "ISO".to_string(),
        },
    }
}

#[test]
fn test_method_name_is_humanized() {
    let headers = registry().headers::<Book>(Style::Default).unwrap();
    assert!(headers.contains(&"Description".to_string()));
}

#[test]
fn test_string_label_is_unmodified() {
    let headers = registry().headers::<Book>(Style::Default).unwrap();
    assert!(headers.contains(&"Title".to_string()));
    assert!(headers.contains(&"ISBN-10".to_string()));
}

#[test]
fn test_symbol_label_is_humanized() {
    let headers = registry().headers::<Book>(Style::Default).unwrap();
    assert!(headers.contains(&"Issuer".to_string()));
}

#[test]
fn test_full_header_row() {
    let headers = registry().headers::<Book>(Style::Default).unwrap();
    assert_eq!(
        headers,
        vec!["Title", "Description", "ISBN-10", "ISBN-13", "Issuer"]
    );
}

#[test]
fn test_static_column_headers() {
    let headers = registry().headers::<Row>(Style::Default).unwrap();
    assert_eq!(headers, vec!["", "STATIC", "STATIC"]);
}

#[test]
fn test_headers_and_row_have_equal_length() {
    let registry = registry();
    let headers = registry.headers::<Book>(Style::Default).unwrap();
    let row = registry.row(&book(), Style::Default).unwrap();
    assert_eq!(headers.len(), row.len());
    assert_eq!(row[2], Value::from("123123123"));

    let row = registry
        .row(
            &Row {
                id: 1,
                name: "John Doe".to_string(),
            },
            Style::Default,
        )
        .unwrap();
    assert_eq!(row, vec![Value::Null, Value::from(""), Value::from("")]);
}
