//! Entity tables and the incremental escape decoder.
//!
//! Escape grammar:
//! - `&` followed by one of `&`, `"`, `<`, `>` is a one-character shorthand for
//!   that character (no name, no semicolon).
//! - `&` followed by a letter or digit starts a name that runs up to `;` and is
//!   replaced by its table entry. `amp`, `quot`, `lt` and `gt` resolve without
//!   consulting the table.
//!
//! On failure the raw sequence is written to the output unchanged, so decoded
//! text never silently loses input.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::shared::ParseErrorKind;

/// Read-only mapping from entity name to replacement text.
pub trait EntityTable {
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl EntityTable for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl EntityTable for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: EntityTable + ?Sized> EntityTable for &T {
    fn lookup(&self, name: &str) -> Option<&str> {
        (**self).lookup(name)
    }
}

/// Built-in named entities.
const DEFAULT_ENTITIES: &[(&str, &str)] = &[
    // whitespace
    ("Tab", "\t"),
    ("NewLine", "\n"),
    ("sp", " "),
    ("nbsp", "\u{00A0}"),
    ("t", "\t"),
    ("n", "\n"),
    ("v", "\u{000B}"),
    // punctuation
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("bsol", "\\"),
    ("verbar", "|"),
    ("lbrace", "{"),
    ("rbrace", "}"),
    ("semi", ";"),
    // greek
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("epsilon", "ε"),
    ("lambda", "λ"),
    ("mu", "μ"),
    ("pi", "π"),
    ("sigma", "σ"),
    ("omega", "ω"),
    ("Gamma", "Γ"),
    ("Delta", "Δ"),
    ("Sigma", "Σ"),
    ("Omega", "Ω"),
    // arrows
    ("larr", "←"),
    ("rarr", "→"),
    ("uarr", "↑"),
    ("darr", "↓"),
    ("harr", "↔"),
    ("LeftVectorBar", "⥒"),
    // math
    ("pm", "±"),
    ("times", "×"),
    ("divide", "÷"),
    ("ne", "≠"),
    ("le", "≤"),
    ("ge", "≥"),
    ("infin", "∞"),
];

/// Owned entity table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityMap {
    map: HashMap<String, String>,
}

impl EntityMap {
    /// Table with no named entities (the structural four still resolve).
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, replacement: impl Into<String>) {
        self.map.insert(name.into(), replacement.into());
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for EntityMap {
    fn default() -> Self {
        let mut table = Self::empty();
        for (name, replacement) in DEFAULT_ENTITIES {
            table.insert(*name, *replacement);
        }
        table
    }
}

impl EntityTable for EntityMap {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EntityMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::empty();
        for (name, replacement) in iter {
            table.insert(name, replacement);
        }
        table
    }
}

fn structural_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "quot" => Some("\""),
        "lt" => Some("<"),
        "gt" => Some(">"),
        _ => None,
    }
}

/// Default bound on buffered entity-name length.
pub const DEFAULT_MAX_ENTITY_NAME_LEN: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityError {
    InvalidEntityStart(char),
    UnterminatedEntityName(String),
    UnknownEntityName(String),
    TruncatedEscape,
}

impl EntityError {
    /// The code point that triggered the error was not consumed and must be
    /// processed again as ordinary input.
    pub fn needs_reprocess(&self) -> bool {
        matches!(
            self,
            EntityError::InvalidEntityStart(_) | EntityError::UnterminatedEntityName(_)
        )
    }
}

impl From<EntityError> for ParseErrorKind {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::InvalidEntityStart(ch) => ParseErrorKind::InvalidEntityStart(ch),
            EntityError::UnterminatedEntityName(name) => {
                ParseErrorKind::UnterminatedEntityName(name)
            }
            EntityError::UnknownEntityName(name) => ParseErrorKind::UnknownEntityName(name),
            EntityError::TruncatedEscape => ParseErrorKind::TruncatedEscape,
        }
    }
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&ParseErrorKind::from(self.clone()), f)
    }
}

impl std::error::Error for EntityError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EscapeState {
    Text,
    AfterAmpersand,
    InEntityName,
}

/// What a single `feed` call did with its code point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// Copied to the output unchanged.
    Literal,
    /// Buffered; an escape sequence is open.
    Pending,
    /// Closed an escape sequence; its replacement was written.
    Resolved,
}

/// Incremental decoder driven one code point at a time.
#[derive(Clone, Debug)]
pub struct EntityDecoder {
    state: EscapeState,
    name: String,
    name_len: usize,
    max_name_len: usize,
}

impl EntityDecoder {
    pub fn new(max_name_len: usize) -> Self {
        Self {
            state: EscapeState::Text,
            name: String::new(),
            name_len: 0,
            max_name_len,
        }
    }

    /// No escape sequence is open.
    pub fn is_idle(&self) -> bool {
        self.state == EscapeState::Text
    }

    /// Drop any open sequence without writing it.
    pub fn reset(&mut self) {
        self.state = EscapeState::Text;
        self.name.clear();
        self.name_len = 0;
    }

    pub fn feed(
        &mut self,
        ch: char,
        table: &dyn EntityTable,
        out: &mut String,
    ) -> Result<Decoded, EntityError> {
        match self.state {
            EscapeState::Text => {
                if ch == '&' {
                    self.state = EscapeState::AfterAmpersand;
                    return Ok(Decoded::Pending);
                }
                out.push(ch);
                Ok(Decoded::Literal)
            }
            EscapeState::AfterAmpersand => match ch {
                '&' | '"' | '<' | '>' => {
                    out.push(ch);
                    self.state = EscapeState::Text;
                    Ok(Decoded::Resolved)
                }
                ch if ch.is_alphanumeric() => {
                    self.name.clear();
                    self.name.push(ch);
                    self.name_len = 1;
                    self.state = EscapeState::InEntityName;
                    Ok(Decoded::Pending)
                }
                ch => {
                    self.state = EscapeState::Text;
                    out.push('&');
                    Err(EntityError::InvalidEntityStart(ch))
                }
            },
            EscapeState::InEntityName => {
                if ch == ';' {
                    self.state = EscapeState::Text;
                    let name = std::mem::take(&mut self.name);
                    let replacement = structural_entity(&name).or_else(|| table.lookup(&name));
                    return match replacement {
                        Some(text) => {
                            out.push_str(text);
                            Ok(Decoded::Resolved)
                        }
                        None => {
                            out.push('&');
                            out.push_str(&name);
                            out.push(';');
                            Err(EntityError::UnknownEntityName(name))
                        }
                    };
                }
                if ch.is_alphanumeric() && self.name_len < self.max_name_len {
                    self.name.push(ch);
                    self.name_len += 1;
                    return Ok(Decoded::Pending);
                }
                self.state = EscapeState::Text;
                let name = std::mem::take(&mut self.name);
                out.push('&');
                out.push_str(&name);
                Err(EntityError::UnterminatedEntityName(name))
            }
        }
    }

    /// Close the decoder at end of input, writing any open sequence verbatim.
    pub fn finish(&mut self, out: &mut String) -> Result<(), EntityError> {
        match self.state {
            EscapeState::Text => Ok(()),
            EscapeState::AfterAmpersand | EscapeState::InEntityName => {
                self.state = EscapeState::Text;
                out.push('&');
                out.push_str(&self.name);
                self.name.clear();
                Err(EntityError::TruncatedEscape)
            }
        }
    }
}

impl Default for EntityDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTITY_NAME_LEN)
    }
}
