//! Streaming lexer for a hybrid markup format.
//!
//! Text may interleave two tag syntaxes, angle-bracket tags (`<a>...</a>`) and
//! command tags (`{a; ...}`, `{br}`), with `&` escapes, namespaced names and
//! views: `[view|][ns:]local`. Closing tags may omit their name (`</>`, and
//! always do for `}`) and are resolved against the innermost open element of
//! the same view.
//!
//! ```
//! use tlnml::{Token, tokenize};
//!
//! let stream = tokenize("<a><b/>x &amp; y</>");
//! assert!(stream.errors.is_empty());
//! assert_eq!(stream.tokens[2].text(), Some("x & y"));
//! assert!(matches!(&stream.tokens[3], Token::EndElement(end) if end.abbreviated));
//! ```

pub mod entities;
pub mod shared;
pub mod source;
pub mod stack;
pub mod tokenizer;

mod text;

pub use entities::{DEFAULT_MAX_ENTITY_NAME_LEN, EntityDecoder, EntityError, EntityMap, EntityTable};
pub use shared::{
    Attribute, AttributeSet, DEFAULT_NAMESPACE, EndElement, Name, ParseError, ParseErrorKind,
    Position, SourceError, StartElement, Style, TagName, Token, is_name_char, resolve_attr_name,
    resolve_tag_name,
};
pub use source::{CharSource, ReadSource, SourceChar, StrSource};
pub use stack::{OpenElement, StackUnderflow, ViewStacks};
pub use tokenizer::{
    END_OF_INPUT_MARK, Emitted, Tokenizer, TokenizerConfig, TokenizerStats,
    default_unquoted_value_char,
};

/// Every token of an in-memory document, up to and including `EndOfInput`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    /// All parse errors, in source order.
    pub errors: Vec<ParseError>,
}

impl TokenStream {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Tokenize `input` with the default configuration and entity table.
pub fn tokenize(input: &str) -> TokenStream {
    tokenize_with(input, TokenizerConfig::default(), EntityMap::default())
}

pub fn tokenize_with<T: EntityTable>(
    input: &str,
    config: TokenizerConfig,
    entities: T,
) -> TokenStream {
    let mut tokenizer = Tokenizer::with_entities(StrSource::new(input), config, entities);
    let mut stream = TokenStream::default();
    // In-memory sources cannot fail.
    while let Some(Ok(emitted)) = tokenizer.next() {
        stream.errors.extend(emitted.errors);
        stream.tokens.push(emitted.token);
    }
    stream
}
