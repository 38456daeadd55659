//! Tests for the process-wide registry shortcuts.
//!
//! The global registry is shared by every test in this binary, so each test
//! runs serially and uses its own record type.

use comma::{Column, CommaError, Commable, RenderOptions, Style, Value};
use serial_test::serial;

struct Pebbles {
    age: u8,
}

impl Commable for Pebbles {
    fn field(&self, name: &str) -> Option<Value> {
        (name == "age").then(|| Value::from(self.age))
    }
}

struct BammBamm;

impl Commable for BammBamm {
    fn field(&self, _name: &str) -> Option<Value> {
        None
    }
}

struct Dino {
    name: &'static str,
}

impl Commable for Dino {
    fn field(&self, name: &str) -> Option<Value> {
        (name == "name").then(|| Value::from(self.name))
    }
}

#[test]
#[serial]
fn test_define_then_render() {
    comma::define::<Pebbles>(Style::Default, |c| {
        c.column("age");
        c.column(Column::computed(|p: &Pebbles| p.age >= 18).label("Adult"));
    })
    .unwrap();

    let kids = [Pebbles { age: 1 }, Pebbles { age: 30 }];
    let csv = comma::render(&kids, Style::Default, &RenderOptions::default()).unwrap();
    assert_eq!(csv, "Age,Adult\n1,false\n30,true\n");

    assert_eq!(
        comma::headers::<Pebbles>(Style::Default).unwrap(),
        vec!["Age", "Adult"]
    );
    assert_eq!(
        comma::row(&kids[0], Style::Default).unwrap(),
        vec![Value::from(1u8), Value::Bool(false)]
    );
}

#[test]
#[serial]
fn test_undefined_type_fails() {
    let err = comma::render(&[BammBamm], Style::Default, &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, CommaError::ConfigurationNotFound { .. }));
    assert!(!comma::global().is_defined::<BammBamm>());
}

#[test]
#[serial]
fn test_styles_and_redefinition() {
    comma::define::<Dino>("loud", |c| {
        c.column(Column::named("name").map(|v: Value| v.to_string().to_uppercase()));
    })
    .unwrap();
    comma::define::<Dino>("quiet", |c| {
        c.column("name");
    })
    .unwrap();

    let dino = [Dino { name: "Dino" }];
    let options = RenderOptions::new().write_headers(false);
    assert_eq!(comma::render(&dino, "loud", &options).unwrap(), "DINO\n");
    assert_eq!(comma::render(&dino, "quiet", &options).unwrap(), "Dino\n");
    // No default declared: the first declared style is used.
    assert_eq!(comma::render(&dino, Style::Default, &options).unwrap(), "DINO\n");

    comma::define::<Dino>("loud", |c| {
        c.column(Column::fixed("RAWR"));
    })
    .unwrap();
    assert_eq!(comma::render(&dino, "loud", &options).unwrap(), "RAWR\n");
    assert_eq!(
        comma::global().styles::<Dino>(),
        vec![Style::from("loud"), Style::from("quiet")]
    );
}
