//! Character-data accumulator.
//!
//! Collects one run of text between tags. Leading whitespace is skipped until
//! the first significant code point (anything non-whitespace, including `&`);
//! after that everything is written, and `take_token` cuts the buffer back to the
//! end of the last non-whitespace content, so emitted text is trimmed on both
//! edges while interior whitespace is preserved.

use crate::entities::{Decoded, EntityDecoder, EntityTable};
use crate::shared::{ParseError, ParseErrorKind, Position, Token};

/// Whether the code point passed to [`CharData::push`] was consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Fed {
    Consumed,
    /// Not consumed; the caller must dispatch it again.
    Reprocess,
}

#[derive(Debug)]
pub(crate) struct CharData {
    decoder: EntityDecoder,
    buf: String,
    /// Buffer length right after the last non-whitespace content.
    last: usize,
    significant: bool,
    start: Option<Position>,
    errors: Vec<ParseError>,
}

impl CharData {
    pub(crate) fn new(max_entity_name_len: usize) -> Self {
        Self {
            decoder: EntityDecoder::new(max_entity_name_len),
            buf: String::new(),
            last: 0,
            significant: false,
            start: None,
            errors: Vec::new(),
        }
    }

    /// An escape sequence is open; delimiters must be routed here.
    pub(crate) fn on_escape(&self) -> bool {
        !self.decoder.is_idle()
    }

    /// `at` is the position stamp of `ch`.
    pub(crate) fn push(&mut self, ch: char, at: Position, table: &dyn EntityTable) -> Fed {
        if self.start.is_none() {
            self.start = Some(at);
        }
        if ch != '&' && self.decoder.is_idle() {
            let is_space = ch.is_whitespace();
            if !self.significant && is_space {
                return Fed::Consumed;
            }
            self.significant = true;
            self.buf.push(ch);
            if !is_space {
                self.last = self.buf.len();
            }
            return Fed::Consumed;
        }

        self.significant = true;
        match self.decoder.feed(ch, table, &mut self.buf) {
            Ok(Decoded::Pending) => Fed::Consumed,
            Ok(Decoded::Literal | Decoded::Resolved) => {
                self.last = self.buf.len();
                Fed::Consumed
            }
            Err(err) => {
                self.last = self.buf.len();
                let fed = if err.needs_reprocess() {
                    Fed::Reprocess
                } else {
                    Fed::Consumed
                };
                self.errors.push(ParseError::new(err.into(), at));
                fed
            }
        }
    }

    /// Finish the run and build its token, moving decode errors into `errors`.
    ///
    /// Returns `None` when the run never saw significant content.
    pub(crate) fn take_token(
        &mut self,
        end: Position,
        errors: &mut Vec<ParseError>,
    ) -> Option<Token> {
        if self.decoder.finish(&mut self.buf).is_err() {
            self.last = self.buf.len();
            self.errors
                .push(ParseError::new(ParseErrorKind::TruncatedEscape, end));
        }
        let significant = self.significant;
        let start = self.start.take().unwrap_or(end);
        self.buf.truncate(self.last);
        let text = std::mem::take(&mut self.buf);
        errors.append(&mut self.errors);
        self.last = 0;
        self.significant = false;
        significant.then_some(Token::CharacterData {
            text,
            start_position: start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityMap;

    fn run(input: &str) -> (Option<Token>, Vec<ParseError>) {
        let table = EntityMap::default();
        let mut data = CharData::new(32);
        let mut pos = Position::default();
        for ch in input.chars() {
            pos.advance(ch, ch.len_utf8());
            while data.push(ch, pos, &table) == Fed::Reprocess {}
        }
        let mut errors = Vec::new();
        let token = data.take_token(pos, &mut errors);
        (token, errors)
    }

    fn text_of(input: &str) -> String {
        run(input)
            .0
            .and_then(|t| t.text().map(str::to_string))
            .unwrap_or_default()
    }

    #[test]
    fn trims_both_edges_keeps_interior() {
        assert_eq!(text_of("\tHi! "), "Hi!");
        assert_eq!(text_of("  a \n b  "), "a \n b");
    }

    #[test]
    fn whitespace_only_run_is_not_a_token() {
        let (token, errors) = run(" \t\n ");
        assert!(token.is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn decoded_whitespace_survives_trimming() {
        assert_eq!(text_of("Hi! &< &> && &t; &v; \u{b}"), "Hi! < > & \t \u{b}");
    }

    #[test]
    fn start_position_is_first_code_point_of_run() {
        let (token, _) = run("  x");
        assert_eq!(
            token.map(|t| t.start_position()),
            Some(Position::new(1, 0, 1))
        );
    }

    #[test]
    fn decode_errors_travel_with_token() {
        let (token, errors) = run("a &zz; b");
        assert_eq!(token.and_then(|t| t.text().map(str::to_string)).as_deref(), Some("a &zz; b"));
        assert_eq!(
            errors.iter().map(|e| e.kind.clone()).collect::<Vec<_>>(),
            vec![ParseErrorKind::UnknownEntityName("zz".to_string())]
        );
        assert_eq!(errors[0].position, Position::new(6, 0, 6));
    }

    #[test]
    fn lone_ampersand_is_significant_and_truncated() {
        let (token, errors) = run("&");
        assert_eq!(token.and_then(|t| t.text().map(str::to_string)).as_deref(), Some("&"));
        assert_eq!(errors[0].kind, ParseErrorKind::TruncatedEscape);
    }
}
