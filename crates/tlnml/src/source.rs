//! Code-point sources feeding the tokenizer.
//!
//! A source yields one code point at a time together with its width in bytes,
//! and `None` once the stream is exhausted. The tokenizer never closes a
//! source; readers are borrowed or owned by the caller.

use std::io::{ErrorKind, Read};
use std::str::Chars;

use tools::utf8::{REPLACEMENT, Utf8Step, decode_step, finish_step};

use crate::shared::SourceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceChar {
    pub ch: char,
    /// Encoded width in the source, in bytes.
    pub width: usize,
}

pub trait CharSource {
    fn next_char(&mut self) -> Result<Option<SourceChar>, SourceError>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn next_char(&mut self) -> Result<Option<SourceChar>, SourceError> {
        (**self).next_char()
    }
}

/// In-memory source over already decoded text.
#[derive(Clone, Debug)]
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
        }
    }
}

impl CharSource for StrSource<'_> {
    fn next_char(&mut self) -> Result<Option<SourceChar>, SourceError> {
        Ok(self.chars.next().map(|ch| SourceChar {
            ch,
            width: ch.len_utf8(),
        }))
    }
}

const READ_BUF_SIZE: usize = 8 * 1024;

/// Buffered UTF-8 source over any reader.
///
/// Invalid byte sequences decode to U+FFFD but still report their original
/// width, so byte offsets stay aligned with the raw stream.
#[derive(Debug)]
pub struct ReadSource<R> {
    reader: R,
    buf: Box<[u8]>,
    start: usize,
    end: usize,
    eof: bool,
}

impl<R: Read> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(READ_BUF_SIZE, reader)
    }

    /// `capacity` is clamped to at least 4 bytes (one full code point).
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; capacity.max(4)].into_boxed_slice(),
            start: 0,
            end: 0,
            eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> Result<(), SourceError> {
        // Keep an incomplete trailing sequence at the front of the buffer.
        self.buf.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;
        loop {
            match self.reader.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl<R: Read> CharSource for ReadSource<R> {
    fn next_char(&mut self) -> Result<Option<SourceChar>, SourceError> {
        loop {
            let pending = &self.buf[self.start..self.end];
            match decode_step(pending) {
                Utf8Step::Char { ch, width } => {
                    self.start += width;
                    return Ok(Some(SourceChar { ch, width }));
                }
                Utf8Step::Invalid { width } => {
                    self.start += width;
                    return Ok(Some(SourceChar {
                        ch: REPLACEMENT,
                        width,
                    }));
                }
                Utf8Step::Incomplete if self.eof => {
                    return Ok(finish_step(pending).map(|(ch, width)| {
                        self.start = self.end;
                        SourceChar { ch, width }
                    }));
                }
                Utf8Step::Incomplete => self.fill()?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader handing out at most `step` bytes per call.
    struct Trickle<'a> {
        bytes: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
            let n = self.step.min(out.len()).min(self.bytes.len());
            out[..n].copy_from_slice(&self.bytes[..n]);
            self.bytes = &self.bytes[n..];
            Ok(n)
        }
    }

    fn drain(source: &mut impl CharSource) -> Vec<SourceChar> {
        let mut out = Vec::new();
        while let Some(ch) = source.next_char().expect("in-memory source") {
            out.push(ch);
        }
        out
    }

    #[test]
    fn str_source_reports_widths() {
        let chars = drain(&mut StrSource::new("a冬"));
        assert_eq!(
            chars,
            vec![
                SourceChar { ch: 'a', width: 1 },
                SourceChar { ch: '冬', width: 3 }
            ]
        );
    }

    #[test]
    fn read_source_matches_str_source_across_tiny_reads() {
        let text = "hello §ªº冬 😀 world";
        let expected = drain(&mut StrSource::new(text));
        for step in 1..=5 {
            let mut source = ReadSource::with_capacity(
                4,
                Trickle {
                    bytes: text.as_bytes(),
                    step,
                },
            );
            assert_eq!(drain(&mut source), expected, "step={step}");
        }
    }

    #[test]
    fn invalid_and_truncated_bytes_become_replacement() {
        let mut source = ReadSource::new(&[b'a', 0xFF, b'b', 0xE2, 0x82][..]);
        let chars: Vec<_> = drain(&mut source)
            .into_iter()
            .map(|c| (c.ch, c.width))
            .collect();
        assert_eq!(
            chars,
            vec![('a', 1), (REPLACEMENT, 1), ('b', 1), (REPLACEMENT, 2)]
        );
    }

    #[test]
    fn borrowed_reader_is_not_consumed() {
        let mut reader = &b"xy"[..];
        {
            let mut source = ReadSource::new(&mut reader);
            assert_eq!(drain(&mut source).len(), 2);
        }
        assert!(reader.is_empty());
    }
}
