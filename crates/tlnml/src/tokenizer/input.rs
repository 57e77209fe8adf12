//! Tokenizer input helpers.

use super::Tokenizer;
use super::states::TokenizerState;
use crate::source::{CharSource, SourceChar};
use crate::shared::{Position, SourceError};

impl<S: CharSource, T> Tokenizer<S, T> {
    /// Next code point and its position stamp.
    ///
    /// A code point queued for reprocessing is returned first and keeps the
    /// stamp it was read with. A source failure ends the tokenizer.
    pub(super) fn read_char(&mut self) -> Result<Option<(char, Position)>, SourceError> {
        if let Some(pending) = self.reprocess.take() {
            return Ok(Some(pending));
        }
        match self.source.next_char() {
            Ok(Some(SourceChar { ch, width })) => {
                self.position.advance(ch, width);
                self.stats.code_points = self.stats.code_points.saturating_add(1);
                Ok(Some((ch, self.position)))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                log::debug!(target: "tlnml.tokenizer", "source failed at {}: {err}", self.position);
                self.transition_to(TokenizerState::End);
                Err(err)
            }
        }
    }

    /// Hand `ch` back to the dispatcher without consuming more input.
    pub(super) fn reprocess(&mut self, ch: char, at: Position) {
        debug_assert!(self.reprocess.is_none(), "reprocess slot already taken");
        self.reprocess = Some((ch, at));
    }
}
