//! Textual form of tokens for diagnostics.
//!
//! `StartElement('<' view|ns:local false 0:1)`, `EndElement('<' ns:local true
//! 0:8)`, decoded text for character data and `␄` for end of input. The
//! position is omitted when it is the stream start.

use std::fmt;

use crate::shared::{EndElement, Name, Position, StartElement, Token};

/// Control picture printed for `EndOfInput`.
pub const END_OF_INPUT_MARK: char = '\u{2404}';

fn write_tag_name(f: &mut fmt::Formatter<'_>, view: &str, name: &Name) -> fmt::Result {
    if !view.is_empty() {
        write!(f, "{view}|")?;
    }
    write!(f, "{name}")
}

fn write_position(f: &mut fmt::Formatter<'_>, position: Position) -> fmt::Result {
    if position.is_zero() {
        return Ok(());
    }
    write!(f, " {position}")
}

impl fmt::Display for StartElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StartElement('{}' ", self.style.delimiter())?;
        write_tag_name(f, &self.view, &self.name)?;
        for attr in &self.attributes {
            write!(f, " {}={:?}", attr.name, attr.value)?;
        }
        write!(f, " {}", self.self_closing)?;
        write_position(f, self.start_position)?;
        f.write_str(")")
    }
}

impl fmt::Display for EndElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EndElement('{}' ", self.style.delimiter())?;
        write_tag_name(f, &self.view, &self.name)?;
        write!(f, " {}", self.abbreviated)?;
        write_position(f, self.start_position)?;
        f.write_str(")")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::CharacterData { text, .. } => f.write_str(text),
            Token::Comment { text, .. } => write!(f, "Comment({text})"),
            Token::StartElement(elem) => fmt::Display::fmt(elem, f),
            Token::EndElement(elem) => fmt::Display::fmt(elem, f),
            Token::EndOfInput { .. } => write!(f, "{END_OF_INPUT_MARK}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{AttributeSet, Style};

    #[test]
    fn start_element_form() {
        let elem = StartElement {
            style: Style::Angle,
            view: "v".to_string(),
            name: Name::new("ns", "a"),
            attributes: AttributeSet::new(),
            self_closing: false,
            start_position: Position::new(1, 0, 1),
        };
        assert_eq!(elem.to_string(), "StartElement('<' v|ns:a false 0:1)");
    }

    #[test]
    fn end_element_omits_zero_position() {
        let elem = EndElement {
            style: Style::Command,
            view: String::new(),
            name: Name::local("a"),
            abbreviated: true,
            start_position: Position::default(),
        };
        assert_eq!(elem.to_string(), "EndElement('{' :a true)");
    }

    #[test]
    fn text_and_end_of_input() {
        let text = Token::CharacterData {
            text: "Hi!".to_string(),
            start_position: Position::default(),
        };
        assert_eq!(text.to_string(), "Hi!");
        let end = Token::EndOfInput {
            start_position: Position::new(3, 0, 3),
        };
        assert_eq!(end.to_string(), "␄");
    }
}
