//! Attribute parsing for the Commable derive macro.
//!
//! This module parses the `#[comma(...)]` field attributes used by the
//! `Commable` derive macro.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, Result, Token,
};

/// How a field takes part in row extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldRole {
    /// Plain value readable by a named column.
    #[default]
    Value,
    /// Sub-record reachable by a group: `#[comma(nested)]`
    Nested,
    /// Record this struct extends: `#[comma(parent)]`
    Parent,
}

/// Field-level attributes from `#[comma(...)]`.
#[derive(Debug, Clone)]
pub struct CommaAttr {
    pub role: FieldRole,
    /// Hide this field from name lookups.
    pub skip: bool,
    /// Accessor name (default: field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for CommaAttr {
    fn default() -> Self {
        CommaAttr {
            role: FieldRole::Value,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl CommaAttr {
    fn set_role(&mut self, role: FieldRole, span: Span) -> Result<()> {
        if self.role != FieldRole::Value && self.role != role {
            return Err(Error::new(span, "a field cannot be both nested and parent"));
        }
        self.role = role;
        self.span = span;
        Ok(())
    }

    fn validate(self) -> Result<Self> {
        if self.skip && self.role != FieldRole::Value {
            return Err(Error::new(
                self.span,
                "skip cannot be combined with nested or parent",
            ));
        }
        if self.role == FieldRole::Parent && self.rename.is_some() {
            return Err(Error::new(
                self.span,
                "a parent field has no accessor name to rename",
            ));
        }
        Ok(self)
    }
}

impl Parse for CommaAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = CommaAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => {
                    attr.skip = true;
                    attr.span = p.span();
                }
                Meta::Path(p) if p.is_ident("nested") => {
                    attr.set_role(FieldRole::Nested, p.span())?;
                }
                Meta::Path(p) if p.is_ident("parent") => {
                    attr.set_role(FieldRole::Parent, p.span())?;
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        if s.value().is_empty() {
                            return Err(Error::new(s.span(), "rename must not be empty"));
                        }
                        attr.rename = Some(s.value());
                        attr.span = s.span();
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    }
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown comma attribute. Expected: skip, nested, parent, or rename = \"...\"",
                    ));
                }
            }
        }

        attr.validate()
    }
}

/// Extract `#[comma(...)]` attributes from a field's attributes.
pub fn parse_comma_attrs(attrs: &[Attribute]) -> Result<CommaAttr> {
    for attr in attrs {
        if attr.path().is_ident("comma") {
            return attr.parse_args::<CommaAttr>();
        }
    }
    Ok(CommaAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_comma(tokens: &str) -> Result<CommaAttr> {
        syn::parse_str::<CommaAttr>(tokens)
    }

    #[test]
    fn test_empty_is_plain_value() {
        let attr = parse_comma("").unwrap();
        assert_eq!(attr.role, FieldRole::Value);
        assert!(!attr.skip);
        assert_eq!(attr.rename, None);
    }

    #[test]
    fn test_skip() {
        let attr = parse_comma("skip").unwrap();
        assert!(attr.skip);
    }

    #[test]
    fn test_nested() {
        let attr = parse_comma("nested").unwrap();
        assert_eq!(attr.role, FieldRole::Nested);
    }

    #[test]
    fn test_parent() {
        let attr = parse_comma("parent").unwrap();
        assert_eq!(attr.role, FieldRole::Parent);
    }

    #[test]
    fn test_rename() {
        let attr = parse_comma(r#"rename = "surname""#).unwrap();
        assert_eq!(attr.rename, Some("surname".to_string()));
    }

    #[test]
    fn test_rename_with_spaces_is_accepted() {
        let attr = parse_comma(r#"rename = "a b""#).unwrap();
        assert_eq!(attr.rename, Some("a b".to_string()));
    }

    #[test]
    fn test_nested_with_rename() {
        let attr = parse_comma(r#"nested, rename = "isbn""#).unwrap();
        assert_eq!(attr.role, FieldRole::Nested);
        assert_eq!(attr.rename, Some("isbn".to_string()));
    }

    #[test]
    fn test_conflicting_roles() {
        let err = parse_comma("nested, parent").unwrap_err();
        assert!(err.to_string().contains("both nested and parent"));
    }

    #[test]
    fn test_skip_with_role() {
        assert!(parse_comma("skip, nested").is_err());
        assert!(parse_comma("parent, skip").is_err());
    }

    #[test]
    fn test_parent_rename() {
        assert!(parse_comma(r#"parent, rename = "base""#).is_err());
    }

    #[test]
    fn test_rename_must_be_string() {
        let err = parse_comma("rename = 3").unwrap_err();
        assert!(err.to_string().contains("string literal"));
        assert!(parse_comma(r#"rename = """#).is_err());
    }

    #[test]
    fn test_unknown_attribute() {
        let err = parse_comma("width = 3").unwrap_err();
        assert!(err.to_string().contains("unknown comma attribute"));
    }
}
