//! Qualified names and the tag-name resolver.
//!
//! A raw tag-name fragment has the shape `[view|][ns:]local`. A bare leading
//! colon (`:local`) selects the configured default namespace. The resolver
//! never fails: a fragment that does not fit the grammar resolves to an empty
//! view and an empty name, and callers decide whether that is acceptable.

use std::fmt;

/// Namespace identifier used for a bare leading colon unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "tlnml";

/// A `(namespace, local)` pair. Textual form is `space:local`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name {
    pub space: String,
    pub local: String,
}

impl Name {
    pub fn new(space: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            local: local.into(),
        }
    }

    /// Name without a namespace.
    pub fn local(local: impl Into<String>) -> Self {
        Self::new(String::new(), local)
    }

    /// Both parts empty; marks an abbreviated closing tag.
    pub fn is_empty(&self) -> bool {
        self.space.is_empty() && self.local.is_empty()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.space, self.local)
    }
}

/// Resolved tag name together with the view it belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagName {
    pub view: String,
    pub name: Name,
}

impl TagName {
    pub fn is_empty(&self) -> bool {
        self.view.is_empty() && self.name.is_empty()
    }
}

/// Characters allowed inside a view, namespace or local part.
pub fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '.' | '_' | '-')
}

/// Characters the tokenizer collects into a raw tag-name fragment.
pub(crate) fn is_tag_fragment_char(ch: char) -> bool {
    is_name_char(ch) || ch == '|' || ch == ':'
}

/// Characters the tokenizer collects into a raw attribute-name fragment.
pub(crate) fn is_attr_fragment_char(ch: char) -> bool {
    is_name_char(ch) || ch == ':'
}

fn is_name_part(part: &str) -> bool {
    part.chars().all(is_name_char)
}

/// Parse `[view|][ns:]local` into a view and a qualified name.
pub fn resolve_tag_name(fragment: &str, default_namespace: &str) -> TagName {
    let (view, rest) = match fragment.split_once('|') {
        Some((view, rest)) => {
            if view.is_empty() || !is_name_part(view) {
                return TagName::default();
            }
            (view, rest)
        }
        None => ("", fragment),
    };
    match resolve_qualified(rest, default_namespace) {
        Some(name) => TagName {
            view: view.to_string(),
            name,
        },
        None => TagName::default(),
    }
}

/// Parse `[ns:]local` for attribute names; views are not allowed here.
pub fn resolve_attr_name(fragment: &str, default_namespace: &str) -> Name {
    resolve_qualified(fragment, default_namespace).unwrap_or_default()
}

fn resolve_qualified(fragment: &str, default_namespace: &str) -> Option<Name> {
    let (space, local) = match fragment.split_once(':') {
        Some(("", local)) => (default_namespace, local),
        Some((space, local)) => {
            if !is_name_part(space) {
                return None;
            }
            (space, local)
        }
        None => ("", fragment),
    };
    if !is_name_part(local) {
        return None;
    }
    Some(Name::new(space, local))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(fragment: &str) -> TagName {
        resolve_tag_name(fragment, DEFAULT_NAMESPACE)
    }

    #[test]
    fn plain_local_name() {
        assert_eq!(
            resolve("div"),
            TagName {
                view: String::new(),
                name: Name::local("div"),
            }
        );
    }

    #[test]
    fn view_namespace_and_local() {
        let tag = resolve("math|m:frac");
        assert_eq!(tag.view, "math");
        assert_eq!(tag.name, Name::new("m", "frac"));
    }

    #[test]
    fn bare_colon_selects_default_namespace() {
        assert_eq!(resolve(":id").name, Name::new("tlnml", "id"));
        assert_eq!(
            resolve_tag_name(":id", "x").name,
            Name::new("x", "id"),
            "default namespace is configurable"
        );
    }

    #[test]
    fn empty_fragment_and_view_only_are_abbreviated() {
        assert!(resolve("").is_empty());
        let tag = resolve("v|");
        assert_eq!(tag.view, "v");
        assert!(tag.name.is_empty());
    }

    #[test]
    fn name_chars_include_dot_underscore_dash() {
        assert_eq!(resolve("a.b_c-d").name, Name::local("a.b_c-d"));
        assert_eq!(resolve("ζήτα9").name, Name::local("ζήτα9"));
    }

    #[test]
    fn malformed_fragments_resolve_to_empty() {
        assert!(resolve("|x").is_empty());
        assert!(resolve("a|b|c").is_empty());
        assert!(resolve("a:b:c").is_empty());
    }

    #[test]
    fn attribute_names_reject_views() {
        assert_eq!(resolve_attr_name("xml:lang", "d"), Name::new("xml", "lang"));
        assert_eq!(resolve_attr_name(":id", "d"), Name::new("d", "id"));
        assert!(resolve_attr_name("v|id", "d").is_empty());
    }

    #[test]
    fn textual_form() {
        assert_eq!(Name::new("ns", "a").to_string(), "ns:a");
        assert_eq!(Name::local("a").to_string(), ":a");
    }
}
