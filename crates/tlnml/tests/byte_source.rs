//! Byte-stream input must tokenize exactly like the same text in memory.

use std::io::Read;
use tlnml::{Emitted, ReadSource, StrSource, Token, Tokenizer, TokenizerConfig};
use tlnml_test_support::{ChunkedReader, diff_lines, format_emitted};

const DOCUMENT: &str = "<doc lang=\"ελ\">\n  Καλημέρα &amp; 冬 &pm; 😀\n  \
    <v|m:frac a='1'>x</v|>\n  <!-- ✓ -->{b; bold}{br}\n</>\n";

fn collect<S: tlnml::CharSource>(tokenizer: Tokenizer<S>) -> Vec<Emitted> {
    tokenizer
        .map(|emitted| emitted.expect("source does not fail"))
        .collect()
}

fn lines(emitted: &[Emitted]) -> Vec<String> {
    emitted.iter().flat_map(format_emitted).collect()
}

#[test]
fn chunked_reads_match_in_memory_tokens() {
    let expected = collect(Tokenizer::with_config(
        StrSource::new(DOCUMENT),
        TokenizerConfig::hybrid(),
    ));
    for step in 1..=8 {
        let source = ReadSource::with_capacity(4, ChunkedReader::new(DOCUMENT.as_bytes(), step));
        let actual = collect(Tokenizer::with_config(source, TokenizerConfig::hybrid()));
        assert!(
            actual == expected,
            "step={step}\n{}",
            diff_lines(&lines(&expected), &lines(&actual))
        );
    }
}

#[test]
fn byte_offsets_count_utf8_bytes() {
    let source = ReadSource::new(ChunkedReader::new("冬<a>".as_bytes(), 1));
    let tokens: Vec<Token> = collect(Tokenizer::new(source))
        .into_iter()
        .map(|emitted| emitted.token)
        .collect();
    let start = tokens[1].start_position();
    assert_eq!((start.byte_offset, start.line, start.column), (4, 0, 2));
}

#[test]
fn invalid_utf8_becomes_replacement_text() {
    let bytes = [b'a', 0xFF, b'b'];
    let tokens: Vec<Token> = collect(Tokenizer::new(ReadSource::new(&bytes[..])))
        .into_iter()
        .map(|emitted| emitted.token)
        .collect();
    assert_eq!(tokens[0].text(), Some("a\u{FFFD}b"));
    assert_eq!(tokens[1].start_position().byte_offset, 3);
}

#[test]
fn reader_is_left_usable_after_tokenizing() {
    let mut reader = ChunkedReader::new(b"<a/>", 2);
    {
        let mut source = ReadSource::new(&mut reader);
        let mut tokenizer = Tokenizer::new(&mut source);
        while !tokenizer.next_token().expect("reader").token.is_end_of_input() {}
    }
    let mut rest = Vec::new();
    reader.read_to_end(&mut rest).expect("reader");
    assert!(rest.is_empty());
}
