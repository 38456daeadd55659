//! Property-based tests for comma using proptest.

use comma::{humanize, Column, Columns, Commable, Group, Registry, Style, Value};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone)]
struct Item {
    name: String,
    count: i64,
}

impl Commable for Item {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::from(&self.name)),
            "count" => Some(Value::from(self.count)),
            _ => None,
        }
    }
}

/// One column declaration, chosen at random.
#[derive(Debug, Clone)]
enum Decl {
    Named(&'static str),
    Labeled(&'static str, String),
    Fixed(i64),
    Computed,
    Group(Vec<Decl>),
}

fn decl_strategy() -> impl Strategy<Value = Decl> {
    let leaf = prop_oneof![
        prop::sample::select(vec!["name", "count"]).prop_map(Decl::Named),
        (prop::sample::select(vec!["name", "count"]), "[A-Za-z ]{0,8}")
            .prop_map(|(n, l)| Decl::Labeled(n, l)),
        any::<i64>().prop_map(Decl::Fixed),
        Just(Decl::Computed),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Decl::Group)
    })
}

fn declare(columns: &mut Columns<'_, Item>, decls: &[Decl]) {
    for decl in decls {
        match decl {
            Decl::Named(name) => {
                columns.column(*name);
            }
            Decl::Labeled(name, label) => {
                columns.column(Column::named(*name).label(label.clone()));
            }
            Decl::Fixed(v) => {
                columns.column(Column::fixed(*v));
            }
            Decl::Computed => {
                columns.column(Column::computed(|i: &Item| i.name.len()));
            }
            Decl::Group(children) => {
                columns.group(Group::<Item>::inline().label("G"), |g| declare(g, children));
            }
        }
    }
}

fn item_strategy() -> impl Strategy<Value = Item> {
    ("[a-z]{0,10}", any::<i64>()).prop_map(|(name, count)| Item { name, count })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Humanize is deterministic.
    #[test]
    fn humanize_is_deterministic(token in "[A-Za-z0-9_ -]{0,24}") {
        prop_assert_eq!(humanize(&token), humanize(&token));
    }

    /// Humanizing a humanized label does not change it.
    #[test]
    fn humanize_is_idempotent(token in "[a-z][a-z0-9_]{0,16}") {
        let once = humanize(&token);
        prop_assert_eq!(humanize(&once), once.clone());
    }

    /// Humanized labels never carry underscores or edge spaces.
    #[test]
    fn humanize_trims_separators(token in "_{0,3}[a-z]{1,8}(_{1,3}[a-z]{1,8})?_{0,3}") {
        let label = humanize(&token);
        prop_assert!(!label.starts_with(' '));
        prop_assert!(!label.ends_with(' '));
        prop_assert!(!label.contains('_'));
        prop_assert!(!label.contains("  "));
    }

    /// Hyphens are never word boundaries.
    #[test]
    fn humanize_keeps_hyphens(left in "[a-z]{1,6}", right in "[a-z0-9]{1,6}") {
        let label = humanize(&format!("{left}-{right}"));
        prop_assert!(label.contains('-'));
        prop_assert!(!label.contains(' '));
    }

    /// Header row and every data row have the same length after flattening.
    #[test]
    fn headers_and_rows_have_equal_length(
        decls in prop::collection::vec(decl_strategy(), 0..6),
        items in prop::collection::vec(item_strategy(), 0..5),
    ) {
        let mut registry = Registry::new();
        registry
            .define::<Item>(Style::Default, |c| declare(c, &decls))
            .unwrap();

        let headers = registry.headers::<Item>(Style::Default).unwrap();
        for item in &items {
            let row = registry.row(item, Style::Default).unwrap();
            prop_assert_eq!(row.len(), headers.len());
        }
    }

    /// A rendered table has one line per item, plus the header when enabled.
    #[test]
    fn rendered_line_count(items in prop::collection::vec(item_strategy(), 0..8)) {
        let mut registry = Registry::new();
        registry
            .define::<Item>(Style::Default, |c| {
                c.column("name").column("count");
            })
            .unwrap();

        let csv = registry
            .render(&items, Style::Default, &comma::RenderOptions::default())
            .unwrap();
        prop_assert_eq!(csv.lines().count(), items.len() + 1);
    }
}
