//! Source positions reported on tokens and errors.

use std::fmt;

/// Byte offset, line and column of a point in the input stream.
///
/// Invariant: monotonically non-decreasing across a parse. `line` is zero-based;
/// a newline increments it and resets `column` to zero. `column` counts code
/// points, `byte_offset` counts UTF-8 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub byte_offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(byte_offset: usize, line: usize, column: usize) -> Self {
        Self {
            byte_offset,
            line,
            column,
        }
    }

    /// Step over one code point that occupies `width` bytes in the source.
    pub fn advance(&mut self, ch: char, width: usize) {
        self.byte_offset += width;
        self.column += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        }
    }

    pub fn is_zero(self) -> bool {
        self.byte_offset == 0 && self.line == 0 && self.column == 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
