//! Types shared by the tokenizer and its consumers.
//!
//! Downstream code should import these through the crate root
//! (`tlnml::{Token, Name, Position, ...}`).

mod error;
mod name;
mod position;
mod token;

pub use error::{ParseError, ParseErrorKind, SourceError};
pub use name::{
    DEFAULT_NAMESPACE, Name, TagName, is_name_char, resolve_attr_name, resolve_tag_name,
};
pub(crate) use name::{is_attr_fragment_char, is_tag_fragment_char};
pub use position::Position;
pub use token::{Attribute, AttributeSet, EndElement, StartElement, Style, Token};
