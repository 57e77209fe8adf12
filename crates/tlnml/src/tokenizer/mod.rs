//! Streaming tokenizer public API.
//!
//! The tokenizer is an explicit state machine driven one code point at a time.
//! `next_token` pulls code points from its source until exactly one token is
//! complete and returns it together with the parse errors found while building
//! it.
//!
//! Invariants:
//! - Idempotent tail: after the first `EndOfInput` every call returns
//!   `EndOfInput` again, with no errors.
//! - Token start positions are non-decreasing.
//! - A non-self-closing start tag with a local name is pushed on the stack of
//!   its view when it is emitted; a closing tag pops the stack of the view it
//!   names, never another. `}` pops the view of the innermost open `{` element.
//! - A tag hit by `UnexpectedCharInTag` is never emitted and never touches the
//!   stacks; its errors travel with the next token.
//! - Every state has a defined transition for every code point; no input can
//!   make the tokenizer loop without consuming.

use crate::entities::{EntityMap, EntityTable};
use crate::shared::{
    EndElement, Name, ParseError, ParseErrorKind, Position, SourceError, StartElement, Style,
    TagName, Token, is_attr_fragment_char, is_tag_fragment_char, resolve_attr_name,
    resolve_tag_name,
};
use crate::source::CharSource;
use crate::stack::{OpenElement, ViewStacks};
use crate::text::{CharData, Fed};
use states::{EndTagState, StartTagState, TokenizerState};
use tag::{PendingTag, TagKind};

mod emit;
mod input;
mod states;
mod tag;
mod token_fmt;

pub use token_fmt::END_OF_INPUT_MARK;


/// Default class of characters allowed in an unquoted attribute value.
pub fn default_unquoted_value_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}

/// Configuration for the tokenizer.
#[derive(Clone, Debug)]
pub struct TokenizerConfig {
    /// Delimiter families recognized as tag openers in text.
    pub styles: Vec<Style>,
    /// Namespace assigned by a bare leading colon.
    pub default_namespace: String,
    /// Longest entity name buffered before the escape is abandoned.
    pub max_entity_name_len: usize,
    pub unquoted_value_char: fn(char) -> bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            styles: vec![Style::Angle],
            default_namespace: crate::shared::DEFAULT_NAMESPACE.to_string(),
            max_entity_name_len: crate::entities::DEFAULT_MAX_ENTITY_NAME_LEN,
            unquoted_value_char: default_unquoted_value_char,
        }
    }
}

impl TokenizerConfig {
    /// Both `<` and `{` open tags.
    pub fn hybrid() -> Self {
        Self {
            styles: vec![Style::Angle, Style::Command],
            ..Self::default()
        }
    }

    pub fn with_styles(mut self, styles: impl IntoIterator<Item = Style>) -> Self {
        self.styles = styles.into_iter().collect();
        self
    }

    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    pub fn with_max_entity_name_len(mut self, len: usize) -> Self {
        self.max_entity_name_len = len;
        self
    }

    pub fn with_unquoted_value_char(mut self, class: fn(char) -> bool) -> Self {
        self.unquoted_value_char = class;
        self
    }

    fn style_for(&self, ch: char) -> Option<Style> {
        self.styles
            .iter()
            .copied()
            .find(|style| style.delimiter() == ch)
    }
}

/// One token and the parse errors reported while producing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Emitted {
    pub token: Token,
    pub errors: Vec<ParseError>,
}

/// Minimal tokenizer instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub code_points: u64,
    pub state_transitions: u64,
    pub tokens_emitted: u64,
    pub parse_errors: u64,
    /// Deepest any single view stack has been.
    pub max_open_depth: u64,
}

/// Pull-based tokenizer over a code-point source.
///
/// The tokenizer owns its source value but never closes anything behind it;
/// pass `&mut source` to keep using the source afterwards.
pub struct Tokenizer<S, T = EntityMap> {
    source: S,
    entities: T,
    config: TokenizerConfig,
    state: TokenizerState,
    position: Position,
    reprocess: Option<(char, Position)>,
    text: CharData,
    tag: PendingTag,
    stacks: ViewStacks,
    errors: Vec<ParseError>,
    /// Source error held back until pending text has been delivered.
    failure: Option<SourceError>,
    eof_yielded: bool,
    stats: TokenizerStats,
}

impl<S: CharSource> Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, TokenizerConfig::default())
    }

    pub fn with_config(source: S, config: TokenizerConfig) -> Self {
        Self::with_entities(source, config, EntityMap::default())
    }
}

impl<S, T> Tokenizer<S, T> {
    /// Position after the last consumed code point.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Return a copy of current instrumentation counters.
    pub fn stats(&self) -> TokenizerStats {
        self.stats
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Open elements of `view`, outermost first.
    pub fn open_elements(&self, view: &str) -> &[OpenElement] {
        self.stacks.open_elements(view)
    }

    /// Every element still open, views in sorted order, outermost first.
    ///
    /// Unclosed elements are not an error for the tokenizer itself.
    pub fn unclosed(&self) -> impl Iterator<Item = &OpenElement> + '_ {
        self.stacks.unclosed()
    }

    /// `EndOfInput` has been reached (or the source failed).
    pub fn is_finished(&self) -> bool {
        self.state == TokenizerState::End
    }

    pub fn into_source(self) -> S {
        self.source
    }

    fn transition_to(&mut self, next: TokenizerState) {
        if self.state == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        {
            log::trace!(
                target: "tlnml.tokenizer",
                "state {:?} -> {:?} @{}",
                self.state,
                next,
                self.position
            );
        }
        self.state = next;
        self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
    }
}

impl<S: CharSource, T: EntityTable> Tokenizer<S, T> {
    pub fn with_entities(source: S, config: TokenizerConfig, entities: T) -> Self {
        let max_entity_name_len = config.max_entity_name_len;
        Self {
            source,
            entities,
            config,
            state: TokenizerState::Text,
            position: Position::default(),
            reprocess: None,
            text: CharData::new(max_entity_name_len),
            tag: PendingTag::new(max_entity_name_len),
            stacks: ViewStacks::new(),
            errors: Vec::new(),
            failure: None,
            eof_yielded: false,
            stats: TokenizerStats::default(),
        }
    }

    /// Produce the next token.
    ///
    /// Recoverable and structural problems travel in [`Emitted::errors`] next
    /// to the best-effort token. Only a failing source is returned as `Err`,
    /// right after any text read before the failure; after that the tokenizer
    /// is finished and yields `EndOfInput`.
    pub fn next_token(&mut self) -> Result<Emitted, SourceError> {
        loop {
            if let Some(err) = self.failure.take() {
                return Err(err);
            }
            if self.state == TokenizerState::End {
                let token = Token::EndOfInput {
                    start_position: self.position,
                };
                return Ok(self.emit(token));
            }
            let next = match self.read_char() {
                Ok(next) => next,
                Err(err) => {
                    if let Some(text) = self.text.take_token(self.position, &mut self.errors) {
                        self.failure = Some(err);
                        return Ok(self.emit(text));
                    }
                    self.errors.clear();
                    return Err(err);
                }
            };
            let Some((ch, at)) = next else {
                let token = self.end_of_input();
                return Ok(self.emit(token));
            };
            if let Some(token) = self.step(ch, at) {
                return Ok(self.emit(token));
            }
        }
    }

    fn step(&mut self, ch: char, at: Position) -> Option<Token> {
        match self.state {
            TokenizerState::Text => self.step_text(ch, at),
            TokenizerState::TagAmbiguous => {
                self.step_tag_ambiguous(ch, at);
                None
            }
            TokenizerState::StartTag(sub) => self.step_start_tag(sub, ch, at),
            TokenizerState::EndTag(sub) => self.step_end_tag(sub, ch, at),
            TokenizerState::CommentOpen { dashes } => self.step_comment_open(dashes, ch, at),
            TokenizerState::Comment => self.step_comment(ch),
            TokenizerState::Resync => self.step_resync(ch),
            TokenizerState::End => None,
        }
    }

    fn step_text(&mut self, ch: char, at: Position) -> Option<Token> {
        if !self.text.on_escape() {
            if let Some(style) = self.config.style_for(ch) {
                let pending = self.text.take_token(at, &mut self.errors);
                self.tag.begin(style, at);
                self.transition_to(TokenizerState::TagAmbiguous);
                return pending;
            }
            if ch == Style::Command.head_end() && self.config.styles.contains(&Style::Command) {
                if let Some(pending) = self.text.take_token(at, &mut self.errors) {
                    self.reprocess(ch, at);
                    return Some(pending);
                }
                return Some(self.close_command(at));
            }
        }
        if self.text.push(ch, at, &self.entities) == Fed::Reprocess {
            self.reprocess(ch, at);
        }
        None
    }

    fn step_tag_ambiguous(&mut self, ch: char, at: Position) {
        if self.tag.style == Style::Command {
            self.tag.kind = TagKind::Start;
            self.transition_to(TokenizerState::StartTag(StartTagState::Name));
            self.reprocess(ch, at);
            return;
        }
        match ch {
            '/' => {
                self.tag.kind = TagKind::End;
                self.transition_to(TokenizerState::EndTag(EndTagState::Name));
            }
            '!' => {
                self.tag.kind = TagKind::Comment;
                self.transition_to(TokenizerState::CommentOpen { dashes: 0 });
            }
            _ => {
                self.tag.kind = TagKind::Start;
                self.transition_to(TokenizerState::StartTag(StartTagState::Name));
                self.reprocess(ch, at);
            }
        }
    }

    fn step_start_tag(&mut self, sub: StartTagState, ch: char, at: Position) -> Option<Token> {
        match sub {
            StartTagState::Name => {
                if is_tag_fragment_char(ch) {
                    self.tag.raw_name.push(ch);
                    return None;
                }
                if self.tag.raw_name.is_empty() {
                    return self.unexpected_char(ch, at);
                }
                self.resolve_start_name();
                self.transition_to(TokenizerState::StartTag(StartTagState::Attributes));
                self.reprocess(ch, at);
                None
            }
            StartTagState::Attributes => match (self.tag.style, ch) {
                (Style::Angle, '>') | (Style::Command, ';') => self.finish_tag(),
                (Style::Angle, '/') => {
                    self.transition_to(TokenizerState::StartTag(StartTagState::SelfClosePending));
                    None
                }
                (Style::Command, '}') => {
                    self.tag.self_closing = true;
                    self.finish_tag()
                }
                (_, ch) if ch.is_whitespace() => None,
                (_, ch) if is_attr_fragment_char(ch) => {
                    self.tag.attr_raw.push(ch);
                    self.transition_to(TokenizerState::StartTag(StartTagState::AttrName));
                    None
                }
                _ => self.unexpected_char(ch, at),
            },
            StartTagState::AttrName => {
                if is_attr_fragment_char(ch) {
                    self.tag.attr_raw.push(ch);
                    return None;
                }
                let name = resolve_attr_name(&self.tag.attr_raw, &self.config.default_namespace);
                if name.local.is_empty() {
                    let raw = self.tag.attr_raw.clone();
                    self.record_error(ParseErrorKind::MalformedTagName(raw), at);
                } else {
                    self.tag.attr_name = Some(name);
                }
                self.transition_to(TokenizerState::StartTag(StartTagState::AfterAttrName));
                self.reprocess(ch, at);
                None
            }
            StartTagState::AfterAttrName => {
                match ch {
                    '=' => self.transition_to(TokenizerState::StartTag(
                        StartTagState::BeforeAttrValue,
                    )),
                    ch if ch.is_whitespace() => {}
                    _ => {
                        self.tag.commit_attribute(false);
                        self.transition_to(TokenizerState::StartTag(StartTagState::Attributes));
                        self.reprocess(ch, at);
                    }
                }
                None
            }
            StartTagState::BeforeAttrValue => {
                match ch {
                    '"' | '\'' => self.transition_to(TokenizerState::StartTag(
                        StartTagState::AttrValueQuoted(ch),
                    )),
                    ch if ch.is_whitespace() => {}
                    ch if (self.config.unquoted_value_char)(ch) => {
                        self.tag.attr_value.push(ch);
                        self.transition_to(TokenizerState::StartTag(
                            StartTagState::AttrValueUnquoted,
                        ));
                    }
                    _ => return self.unexpected_char(ch, at),
                }
                None
            }
            StartTagState::AttrValueQuoted(quote) => {
                if ch == quote && self.tag.value_decoder.is_idle() {
                    self.tag.commit_attribute(true);
                    self.transition_to(TokenizerState::StartTag(StartTagState::Attributes));
                    return None;
                }
                let fed = self
                    .tag
                    .value_decoder
                    .feed(ch, &self.entities, &mut self.tag.attr_value);
                if let Err(err) = fed {
                    if err.needs_reprocess() {
                        self.reprocess(ch, at);
                    }
                    self.record_error(err.into(), at);
                }
                None
            }
            StartTagState::AttrValueUnquoted => {
                if (self.config.unquoted_value_char)(ch) {
                    self.tag.attr_value.push(ch);
                    return None;
                }
                self.tag.commit_attribute(false);
                if !ch.is_whitespace() && !self.ends_attributes(ch) {
                    return self.unexpected_char(ch, at);
                }
                self.transition_to(TokenizerState::StartTag(StartTagState::Attributes));
                self.reprocess(ch, at);
                None
            }
            StartTagState::SelfClosePending => {
                self.tag.self_closing = true;
                if ch == '>' {
                    return self.finish_tag();
                }
                self.unexpected_char(ch, at)
            }
        }
    }

    fn step_end_tag(&mut self, sub: EndTagState, ch: char, at: Position) -> Option<Token> {
        match sub {
            EndTagState::Name => {
                if is_tag_fragment_char(ch) {
                    self.tag.raw_name.push(ch);
                } else {
                    self.transition_to(TokenizerState::EndTag(EndTagState::AfterName));
                    self.reprocess(ch, at);
                }
                None
            }
            EndTagState::AfterName => match ch {
                '>' => self.finish_tag(),
                ch if ch.is_whitespace() => None,
                _ => self.unexpected_char(ch, at),
            },
        }
    }

    fn step_comment_open(&mut self, dashes: u8, ch: char, at: Position) -> Option<Token> {
        if ch == '-' {
            let next = if dashes == 0 {
                TokenizerState::CommentOpen { dashes: 1 }
            } else {
                TokenizerState::Comment
            };
            self.transition_to(next);
            return None;
        }
        // Bogus comment: keep everything after the delimiter and `!`.
        for _ in 0..dashes {
            self.tag.text.push('-');
        }
        self.unexpected_char(ch, at)
    }

    fn step_comment(&mut self, ch: char) -> Option<Token> {
        if ch == '>' && self.tag.text.ends_with("--") {
            let len = self.tag.text.len() - 2;
            self.tag.text.truncate(len);
            return self.finish_tag();
        }
        self.tag.text.push(ch);
        None
    }

    fn step_resync(&mut self, ch: char) -> Option<Token> {
        if ch == self.tag.style.head_end() {
            return self.finish_tag();
        }
        if self.tag.kind == TagKind::Comment {
            self.tag.text.push(ch);
        }
        None
    }

    /// Characters that end an attribute list in the current tag's style.
    fn ends_attributes(&self, ch: char) -> bool {
        match self.tag.style {
            Style::Angle => ch == '/' || ch == '>',
            Style::Command => ch == ';' || ch == '}',
        }
    }

    /// Report `ch` and skip to the end of the tag head. Only a bogus comment
    /// survives this; any other tag is dropped there.
    fn unexpected_char(&mut self, ch: char, at: Position) -> Option<Token> {
        self.record_error(ParseErrorKind::UnexpectedCharInTag(ch), at);
        self.tag.commit_attribute(false);
        if self.tag.kind != TagKind::Comment {
            self.tag.broken = true;
        }
        if ch == self.tag.style.head_end() {
            return self.finish_tag();
        }
        if self.tag.kind == TagKind::Comment {
            self.tag.text.push(ch);
        }
        self.transition_to(TokenizerState::Resync);
        None
    }

    fn end_of_input(&mut self) -> Token {
        let at = self.position;
        match self.state {
            TokenizerState::Text => {
                self.transition_to(TokenizerState::End);
                if let Some(text) = self.text.take_token(at, &mut self.errors) {
                    return text;
                }
            }
            TokenizerState::End => {}
            _ => {
                // The partial tag is dropped.
                self.record_error(ParseErrorKind::UnexpectedEndOfInput, at);
                self.transition_to(TokenizerState::End);
            }
        }
        Token::EndOfInput { start_position: at }
    }

    fn resolve_start_name(&mut self) {
        let TagName { view, name } =
            resolve_tag_name(&self.tag.raw_name, &self.config.default_namespace);
        if name.local.is_empty() {
            let raw = self.tag.raw_name.clone();
            self.record_error(ParseErrorKind::MalformedTagName(raw), self.tag.start);
        }
        self.tag.view = view;
        self.tag.name = name;
    }

    fn finish_tag(&mut self) -> Option<Token> {
        self.transition_to(TokenizerState::Text);
        if self.tag.broken {
            return None;
        }
        let token = match self.tag.kind {
            TagKind::Start => self.finish_start_tag(),
            TagKind::End => self.finish_end_tag(),
            TagKind::Comment => Token::Comment {
                text: std::mem::take(&mut self.tag.text),
                start_position: self.tag.start,
            },
        };
        Some(token)
    }

    fn finish_start_tag(&mut self) -> Token {
        let elem = StartElement {
            style: self.tag.style,
            view: std::mem::take(&mut self.tag.view),
            name: std::mem::take(&mut self.tag.name),
            attributes: std::mem::take(&mut self.tag.attributes),
            self_closing: self.tag.self_closing,
            start_position: self.tag.start,
        };
        // A nameless opener would capture the next abbreviated closer.
        if !elem.self_closing && !elem.name.local.is_empty() {
            self.stacks.push(OpenElement::from(&elem));
            self.stats.max_open_depth = self.stacks.max_depth() as u64;
        }
        Token::StartElement(elem)
    }

    fn finish_end_tag(&mut self) -> Token {
        let start = self.tag.start;
        let TagName { view, name } =
            resolve_tag_name(&self.tag.raw_name, &self.config.default_namespace);
        if view.is_empty() && name.is_empty() && !self.tag.raw_name.is_empty() {
            let raw = self.tag.raw_name.clone();
            self.record_error(ParseErrorKind::MalformedTagName(raw), start);
        }
        let abbreviated = name.is_empty();
        let name = match self.stacks.pop(&view) {
            Ok(open) if abbreviated => open.name,
            Ok(open) => {
                if open.name != name {
                    self.record_error(
                        ParseErrorKind::MismatchedClosingTag {
                            expected: open.name,
                            found: name.clone(),
                        },
                        start,
                    );
                }
                name
            }
            Err(underflow) => {
                self.record_error(
                    ParseErrorKind::UnmatchedClosingTag {
                        view: underflow.view,
                    },
                    start,
                );
                name
            }
        };
        Token::EndElement(EndElement {
            style: self.tag.style,
            view,
            name,
            abbreviated,
            start_position: start,
        })
    }

    /// `}` closes the innermost open `{` element, in whichever view it lives.
    fn close_command(&mut self, at: Position) -> Token {
        let view = self
            .stacks
            .innermost_view_of(Style::Command)
            .unwrap_or_default()
            .to_string();
        let opened = self
            .stacks
            .open_elements(&view)
            .iter()
            .rev()
            .find(|open| open.style == Style::Command)
            .map(|open| open.name.clone());
        let name = match self.stacks.pop(&view) {
            Ok(open) => {
                let found = opened.unwrap_or_default();
                if open.style != Style::Command {
                    self.record_error(
                        ParseErrorKind::MismatchedClosingTag {
                            expected: open.name,
                            found: found.clone(),
                        },
                        at,
                    );
                }
                found
            }
            Err(underflow) => {
                self.record_error(
                    ParseErrorKind::UnmatchedClosingTag {
                        view: underflow.view,
                    },
                    at,
                );
                Name::default()
            }
        };
        Token::EndElement(EndElement {
            style: Style::Command,
            view,
            name,
            abbreviated: true,
            start_position: at,
        })
    }
}

impl<S: CharSource, T: EntityTable> Iterator for Tokenizer<S, T> {
    type Item = Result<Emitted, SourceError>;

    /// Yields tokens up to and including the first `EndOfInput`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.eof_yielded {
            return None;
        }
        let result = self.next_token();
        if matches!(&result, Ok(emitted) if emitted.token.is_end_of_input()) {
            self.eof_yielded = true;
        }
        Some(result)
    }
}
