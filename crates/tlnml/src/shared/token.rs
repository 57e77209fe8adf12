//! Token model.

use super::{Name, Position};

/// Delimiter family that produced a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Style {
    /// `<name>` ... `</name>`, `<name/>`
    Angle,
    /// `{name; ...}`, `{name}`
    Command,
}

impl Style {
    /// Opening delimiter for this style.
    pub const fn delimiter(self) -> char {
        match self {
            Style::Angle => '<',
            Style::Command => '{',
        }
    }

    /// Character ending a tag head.
    pub const fn head_end(self) -> char {
        match self {
            Style::Angle => '>',
            Style::Command => '}',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: Name,
    pub value: String,
    pub quoted: bool,
}

/// Attributes of one start tag.
///
/// Determinism contract:
/// - Attributes are stored in encounter order.
/// - Duplicate names are kept; lookups return the first occurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeSet {
    items: Vec<Attribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attr: Attribute) {
        self.items.push(attr);
    }

    pub fn get(&self, name: &Name) -> Option<&Attribute> {
        self.items.iter().find(|attr| attr.name == *name)
    }

    /// First attribute whose local part matches, regardless of namespace.
    pub fn get_local(&self, local: &str) -> Option<&Attribute> {
        self.items.iter().find(|attr| attr.name.local == local)
    }

    pub fn get_all<'a>(&'a self, name: &'a Name) -> impl Iterator<Item = &'a Attribute> + 'a {
        self.items.iter().filter(move |attr| attr.name == *name)
    }

    pub fn has(&self, name: &Name) -> bool {
        self.get(name).is_some()
    }

    /// Replace the value of the first attribute named `name`, or append one.
    pub fn set(&mut self, name: Name, value: impl Into<String>) {
        let value = value.into();
        match self.items.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => {
                attr.value = value;
                attr.quoted = true;
            }
            None => self.items.push(Attribute {
                name,
                value,
                quoted: true,
            }),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartElement {
    pub style: Style,
    pub view: String,
    pub name: Name,
    pub attributes: AttributeSet,
    pub self_closing: bool,
    pub start_position: Position,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndElement {
    pub style: Style,
    pub view: String,
    pub name: Name,
    /// The closer omitted its name and adopted the opener's.
    pub abbreviated: bool,
    pub start_position: Position,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Decoded text run with leading and trailing whitespace stripped.
    CharacterData {
        text: String,
        start_position: Position,
    },
    Comment {
        text: String,
        start_position: Position,
    },
    StartElement(StartElement),
    EndElement(EndElement),
    EndOfInput {
        start_position: Position,
    },
}

impl Token {
    pub fn start_position(&self) -> Position {
        match self {
            Token::CharacterData { start_position, .. }
            | Token::Comment { start_position, .. }
            | Token::EndOfInput { start_position } => *start_position,
            Token::StartElement(elem) => elem.start_position,
            Token::EndElement(elem) => elem.start_position,
        }
    }

    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Token::EndOfInput { .. })
    }

    /// Decoded text for `CharacterData`, `None` for other tokens.
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::CharacterData { text, .. } => Some(text),
            _ => None,
        }
    }
}
