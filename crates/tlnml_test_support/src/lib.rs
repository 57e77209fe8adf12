//! Shared helpers for tokenizer golden tests and benches.

use serde::Deserialize;
use std::fmt::Write;
use std::fs;
use std::io::Read;
use std::path::Path;
use tlnml::{
    Emitted, ReadSource, StartElement, StrSource, Token, Tokenizer, TokenizerConfig,
};

pub const FIXTURE_FORMAT_V1: &str = "tlnml-token-v1";

/// Quote-safe form of token text for fixture lines.
pub fn escape_text(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '"' | '\\' | '\n' | '\r' | '\t' => ch.escape_default().to_string(),
            ch if ch.is_control() => ch.escape_unicode().to_string(),
            ch => ch.to_string(),
        })
        .collect()
}

fn line_at(lines: &[String], i: usize) -> &str {
    lines.get(i).map_or("<missing>", String::as_str)
}

/// First differing line of two token listings, for assertion messages.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let len = expected.len().max(actual.len());
    match (0..len).find(|&i| expected.get(i) != actual.get(i)) {
        Some(i) => format!(
            "line {}:\n  expected: {}\n    actual: {}\n({} expected lines, {} actual)",
            i + 1,
            line_at(expected, i),
            line_at(actual, i),
            expected.len(),
            actual.len()
        ),
        None => format!("no difference in {len} lines"),
    }
}

fn format_start(elem: &StartElement) -> String {
    let mut out = format!("START style={} name=", elem.style.delimiter());
    if !elem.view.is_empty() {
        let _ = write!(&mut out, "{}|", elem.view);
    }
    let _ = write!(&mut out, "{} attrs=[", elem.name);
    for (i, attr) in elem.attributes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        if attr.quoted {
            let _ = write!(&mut out, "{}=\"{}\"", attr.name, escape_text(&attr.value));
        } else if attr.value.is_empty() {
            let _ = write!(&mut out, "{}", attr.name);
        } else {
            let _ = write!(&mut out, "{}={}", attr.name, escape_text(&attr.value));
        }
    }
    let _ = write!(&mut out, "] self_closing={}", elem.self_closing);
    out
}

/// Deterministic one-line form of a token. Positions are left out.
pub fn format_token(token: &Token) -> String {
    match token {
        Token::StartElement(elem) => format_start(elem),
        Token::EndElement(elem) => {
            let mut out = format!("END style={} name=", elem.style.delimiter());
            if !elem.view.is_empty() {
                let _ = write!(&mut out, "{}|", elem.view);
            }
            let _ = write!(&mut out, "{} abbreviated={}", elem.name, elem.abbreviated);
            out
        }
        Token::CharacterData { text, .. } => format!("CHAR text=\"{}\"", escape_text(text)),
        Token::Comment { text, .. } => format!("COMMENT text=\"{}\"", escape_text(text)),
        Token::EndOfInput { .. } => "EOF".to_string(),
    }
}

/// Token line followed by one `ERROR` line per attached error.
pub fn format_emitted(emitted: &Emitted) -> Vec<String> {
    let mut lines = vec![format_token(&emitted.token)];
    for err in &emitted.errors {
        lines.push(format!("ERROR {} @{}", err.kind, err.position));
    }
    lines
}

pub fn config_by_name(name: &str) -> TokenizerConfig {
    match name {
        "default" => TokenizerConfig::default(),
        "hybrid" => TokenizerConfig::hybrid(),
        other => panic!("unknown fixture config '{other}'"),
    }
}

/// Tokenize in-memory text, formatting every emission up to `EndOfInput`.
pub fn run_tokenizer(input: &str, config: TokenizerConfig) -> Vec<String> {
    Tokenizer::with_config(StrSource::new(input), config)
        .flat_map(|emitted| {
            let emitted = emitted.unwrap_or_else(|err| panic!("str source failed: {err}"));
            format_emitted(&emitted)
        })
        .collect()
}

/// Reader handing out at most `step` bytes per `read` call.
pub struct ChunkedReader<'a> {
    bytes: &'a [u8],
    step: usize,
}

impl<'a> ChunkedReader<'a> {
    pub fn new(bytes: &'a [u8], step: usize) -> Self {
        assert!(step > 0, "chunk size must be positive");
        Self { bytes, step }
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        let n = self.step.min(out.len()).min(self.bytes.len());
        out[..n].copy_from_slice(&self.bytes[..n]);
        self.bytes = &self.bytes[n..];
        Ok(n)
    }
}

/// Tokenize raw bytes delivered `step` bytes at a time through a small buffer.
pub fn run_tokenizer_chunked(bytes: &[u8], step: usize, config: TokenizerConfig) -> Vec<String> {
    let source = ReadSource::with_capacity(step.max(4), ChunkedReader::new(bytes, step));
    Tokenizer::with_config(source, config)
        .flat_map(|emitted| {
            let emitted = emitted.unwrap_or_else(|err| panic!("chunked source failed: {err}"));
            format_emitted(&emitted)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    Active,
    Xfail,
    Skip,
}

fn default_status() -> FixtureStatus {
    FixtureStatus::Active
}

fn default_config() -> String {
    "default".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub input: String,
    #[serde(default = "default_config")]
    pub config: String,
    #[serde(default = "default_status")]
    pub status: FixtureStatus,
    #[serde(default)]
    pub reason: Option<String>,
    pub tokens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    format: String,
    #[serde(rename = "case")]
    cases: Vec<Fixture>,
}

/// Load and validate a fixture file.
pub fn load_fixtures(path: &Path) -> Vec<Fixture> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture file {path:?}: {err}"));
    let file: FixtureFile = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse fixture file {path:?}: {err}"));
    assert_eq!(
        file.format, FIXTURE_FORMAT_V1,
        "unsupported fixture format in {path:?}"
    );
    let mut seen = std::collections::BTreeSet::new();
    for case in &file.cases {
        assert!(
            seen.insert(case.name.as_str()),
            "duplicate fixture name '{}' in {path:?}",
            case.name
        );
        if case.status != FixtureStatus::Active {
            assert!(
                case.reason.as_deref().is_some_and(|r| !r.is_empty()),
                "non-active fixture '{}' missing reason in {path:?}",
                case.name
            );
        }
        let last_token = case
            .tokens
            .iter()
            .rev()
            .find(|line| !line.starts_with("ERROR "));
        assert_eq!(
            last_token.map(String::as_str),
            Some("EOF"),
            "fixture '{}' must end with EOF (plus its errors)",
            case.name
        );
    }
    file.cases
}
