/// Incremental UTF-8 decoding helpers for streaming byte sources.
///
/// Decoding is driven one code point at a time so callers can track the byte
/// width of every code point. Sequences split across read boundaries are
/// reported as incomplete rather than invalid, and invalid bytes make forward
/// progress by decoding to U+FFFD.

pub const REPLACEMENT: char = '\u{FFFD}';

/// Outcome of decoding the code point at the start of a byte slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Utf8Step {
    /// A complete code point occupying `width` bytes.
    Char { ch: char, width: usize },
    /// The slice ends inside a sequence (or is empty); more bytes are needed.
    Incomplete,
    /// `width` bytes that cannot start or continue a valid sequence.
    Invalid { width: usize },
}

/// Decode the first code point of `bytes`.
pub fn decode_step(bytes: &[u8]) -> Utf8Step {
    let Some(&first) = bytes.first() else {
        return Utf8Step::Incomplete;
    };
    let expected_len = utf8_seq_len(first);
    if expected_len == 0 {
        return Utf8Step::Invalid { width: 1 };
    }
    let head = &bytes[..expected_len.min(bytes.len())];
    match std::str::from_utf8(head) {
        Ok(s) => match s.chars().next() {
            Some(ch) if head.len() == expected_len => Utf8Step::Char {
                ch,
                width: expected_len,
            },
            _ => Utf8Step::Incomplete,
        },
        Err(e) => match e.error_len() {
            Some(len) => Utf8Step::Invalid { width: len.max(1) },
            None => Utf8Step::Incomplete,
        },
    }
}

/// Decode a trailing incomplete sequence at end of stream: the whole remainder
/// becomes one U+FFFD so the stream is never silently truncated.
pub fn finish_step(bytes: &[u8]) -> Option<(char, usize)> {
    if bytes.is_empty() {
        return None;
    }
    match decode_step(bytes) {
        Utf8Step::Char { ch, width } => Some((ch, width)),
        Utf8Step::Invalid { width } => Some((REPLACEMENT, width)),
        Utf8Step::Incomplete => Some((REPLACEMENT, bytes.len())),
    }
}

fn utf8_seq_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_multibyte() {
        assert_eq!(decode_step(b"ab"), Utf8Step::Char { ch: 'a', width: 1 });
        assert_eq!(
            decode_step("×!".as_bytes()),
            Utf8Step::Char { ch: '×', width: 2 }
        );
        assert_eq!(
            decode_step("😀".as_bytes()),
            Utf8Step::Char { ch: '😀', width: 4 }
        );
    }

    #[test]
    fn split_multibyte_is_incomplete() {
        assert_eq!(decode_step(&[0xC3]), Utf8Step::Incomplete);
        assert_eq!(decode_step(&[0xF0, 0x9F]), Utf8Step::Incomplete);
        assert_eq!(decode_step(&[]), Utf8Step::Incomplete);
    }

    #[test]
    fn invalid_bytes_make_progress() {
        assert_eq!(decode_step(&[0xFF, b'f']), Utf8Step::Invalid { width: 1 });
        assert_eq!(decode_step(&[0xC3, b'f']), Utf8Step::Invalid { width: 1 });
        // Encoded surrogate.
        assert_eq!(
            decode_step(&[0xED, 0xA0, 0x80]),
            Utf8Step::Invalid { width: 1 }
        );
    }

    #[test]
    fn incomplete_suffix_is_flushed() {
        // First 2 bytes of "€" (E2 82 AC).
        assert_eq!(finish_step(&[0xE2, 0x82]), Some((REPLACEMENT, 2)));
        assert_eq!(finish_step(b"x"), Some(('x', 1)));
        assert_eq!(finish_step(&[]), None);
    }
}
