//! Token emission helpers.

use super::{Emitted, Tokenizer};
use crate::shared::{ParseError, ParseErrorKind, Position, Token};

impl<S, T> Tokenizer<S, T> {
    pub(super) fn record_error(&mut self, kind: ParseErrorKind, position: Position) {
        self.errors.push(ParseError::new(kind, position));
    }

    /// Package `token` with every error collected since the previous emission.
    pub(super) fn emit(&mut self, token: Token) -> Emitted {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "tlnml.tokenizer", "emit token: {token:?}");
        let errors = std::mem::take(&mut self.errors);
        for err in &errors {
            log::debug!(target: "tlnml.tokenizer", "parse error: {err}");
        }
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
        self.stats.parse_errors = self
            .stats
            .parse_errors
            .saturating_add(errors.len() as u64);
        Emitted { token, errors }
    }
}
