//! Parse errors reported next to tokens.

use super::{Name, Position};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// `&` followed by something that is neither a shorthand nor a name character.
    InvalidEntityStart(char),
    /// Entity name ended by something other than `;` (or grew past the configured bound).
    UnterminatedEntityName(String),
    /// Entity name not present in the entity table.
    UnknownEntityName(String),
    /// Input ended in the middle of an escape sequence.
    TruncatedEscape,
    UnexpectedCharInTag(char),
    MismatchedClosingTag { expected: Name, found: Name },
    /// Closing tag with no open element in its view.
    UnmatchedClosingTag { view: String },
    MalformedTagName(String),
    /// Input ended inside a tag or comment.
    UnexpectedEndOfInput,
}

impl ParseErrorKind {
    /// Whether tokenization of the affected token can be trusted to continue.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ParseErrorKind::InvalidEntityStart(_)
            | ParseErrorKind::UnterminatedEntityName(_)
            | ParseErrorKind::UnknownEntityName(_)
            | ParseErrorKind::TruncatedEscape
            | ParseErrorKind::MismatchedClosingTag { .. }
            | ParseErrorKind::MalformedTagName(_) => true,
            ParseErrorKind::UnexpectedCharInTag(_)
            | ParseErrorKind::UnmatchedClosingTag { .. }
            | ParseErrorKind::UnexpectedEndOfInput => false,
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::InvalidEntityStart(ch) => {
                write!(f, "unexpected char {ch:?} after '&'")
            }
            ParseErrorKind::UnterminatedEntityName(name) => {
                write!(f, "missing ';' after entity name {name:?}")
            }
            ParseErrorKind::UnknownEntityName(name) => write!(f, "unknown entity {name:?}"),
            ParseErrorKind::TruncatedEscape => write!(f, "input ended inside an escape sequence"),
            ParseErrorKind::UnexpectedCharInTag(ch) => write!(f, "unexpected char {ch:?} in tag"),
            ParseErrorKind::MismatchedClosingTag { expected, found } => {
                write!(f, "wrong element closure, expected {expected} but got {found}")
            }
            ParseErrorKind::UnmatchedClosingTag { view } => {
                write!(f, "closing tag without open element in view {view:?}")
            }
            ParseErrorKind::MalformedTagName(raw) => write!(f, "malformed tag name {raw:?}"),
            ParseErrorKind::UnexpectedEndOfInput => write!(f, "input ended inside a tag"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Position,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.position)
    }
}

impl std::error::Error for ParseError {}

/// Failure of the underlying byte source.
#[derive(Debug)]
pub struct SourceError(pub std::io::Error);

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to read input: {}", self.0)
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        Self(err)
    }
}
