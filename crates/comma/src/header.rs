//! Header derivation for column descriptors.
//!
//! Each descriptor's header follows a fixed precedence:
//!
//! 1. a non-empty [`Label::Text`] is used verbatim;
//! 2. a [`Label::Symbol`] is humanized;
//! 3. otherwise a named accessor is humanized, and static or computed
//!    columns get an empty header.
//!
//! Groups contribute their children's headers in place. A labeled group
//! prefixes each child header with its label.

use crate::column::{Descriptor, Label, Rule};
use crate::registry::Configuration;

/// Headers of a configuration, one per cell, groups flattened.
pub fn headers_for(configuration: &Configuration) -> Vec<String> {
    let mut headers = Vec::with_capacity(configuration.width());
    collect(configuration.descriptors(), None, &mut headers);
    headers
}

fn collect(descriptors: &[Descriptor], prefix: Option<&str>, out: &mut Vec<String>) {
    for descriptor in descriptors {
        match &descriptor.rule {
            Rule::Group { children, .. } => {
                let own = descriptor.label.as_ref().map(label_text);
                let combined = join(prefix, own.as_deref());
                collect(children, combined.as_deref(), out);
            }
            _ => {
                let own = header_for(descriptor);
                out.push(join(prefix, Some(&own)).unwrap_or_default());
            }
        }
    }
}

/// Header of a single leaf descriptor.
pub fn header_for(descriptor: &Descriptor) -> String {
    match &descriptor.label {
        Some(Label::Text(text)) if !text.is_empty() => text.clone(),
        Some(Label::Symbol(symbol)) => humanize(symbol),
        _ => match &descriptor.rule {
            Rule::Named(name) => humanize(name),
            _ => String::new(),
        },
    }
}

fn label_text(label: &Label) -> String {
    match label {
        Label::Text(text) => text.clone(),
        Label::Symbol(symbol) => humanize(symbol),
    }
}

fn join(prefix: Option<&str>, own: Option<&str>) -> Option<String> {
    match (prefix.filter(|p| !p.is_empty()), own.filter(|o| !o.is_empty())) {
        (Some(p), Some(o)) => Some(format!("{} {}", p, o)),
        (Some(p), None) => Some(p.to_string()),
        (None, Some(o)) => Some(o.to_string()),
        (None, None) => None,
    }
}

/// Turns an identifier-like token into a readable label.
///
/// Underscores become single spaces (runs and edges collapse), the label is
/// lower-cased and its first letter capitalized. Hyphens and case changes
/// are not word boundaries.
///
/// ```
/// use comma::humanize;
///
/// assert_eq!(humanize("first_name"), "First name");
/// assert_eq!(humanize("description"), "Description");
/// assert_eq!(humanize("ISBN-10"), "Isbn-10");
/// assert_eq!(humanize("createdAt"), "Createdat");
/// assert_eq!(humanize(""), "");
/// ```
pub fn humanize(token: &str) -> String {
    let words: Vec<&str> = token.split('_').filter(|w| !w.is_empty()).collect();
    let joined = words.join(" ").to_lowercase();

    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
