//! Partially built tag or comment.

use crate::entities::EntityDecoder;
use crate::shared::{Attribute, AttributeSet, Name, Position, Style};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TagKind {
    Start,
    End,
    Comment,
}

#[derive(Debug)]
pub(super) struct PendingTag {
    pub(super) kind: TagKind,
    pub(super) style: Style,
    /// Stamp of the opening delimiter.
    pub(super) start: Position,
    pub(super) raw_name: String,
    pub(super) view: String,
    pub(super) name: Name,
    pub(super) self_closing: bool,
    pub(super) attributes: AttributeSet,
    pub(super) attr_raw: String,
    pub(super) attr_name: Option<Name>,
    pub(super) attr_value: String,
    pub(super) value_decoder: EntityDecoder,
    /// Comment body, or the discarded text of a bogus comment.
    pub(super) text: String,
    /// Hit a structural error; dropped once its head ends.
    pub(super) broken: bool,
}

impl PendingTag {
    pub(super) fn new(max_entity_name_len: usize) -> Self {
        Self {
            kind: TagKind::Start,
            style: Style::Angle,
            start: Position::default(),
            raw_name: String::new(),
            view: String::new(),
            name: Name::default(),
            self_closing: false,
            attributes: AttributeSet::new(),
            attr_raw: String::new(),
            attr_name: None,
            attr_value: String::new(),
            value_decoder: EntityDecoder::new(max_entity_name_len),
            text: String::new(),
            broken: false,
        }
    }

    /// Start over for a tag opened by `style` at `start`.
    pub(super) fn begin(&mut self, style: Style, start: Position) {
        self.kind = TagKind::Start;
        self.style = style;
        self.start = start;
        self.raw_name.clear();
        self.view.clear();
        self.name = Name::default();
        self.self_closing = false;
        self.attributes = AttributeSet::new();
        self.attr_raw.clear();
        self.attr_name = None;
        self.attr_value.clear();
        self.value_decoder.reset();
        self.text.clear();
        self.broken = false;
    }

    /// Move the pending attribute, if any, into the attribute set. A dropped
    /// (malformed) attribute still clears its buffered value.
    pub(super) fn commit_attribute(&mut self, quoted: bool) {
        let value = std::mem::take(&mut self.attr_value);
        if let Some(name) = self.attr_name.take() {
            self.attributes.push(Attribute {
                name,
                value,
                quoted,
            });
        }
        self.attr_raw.clear();
    }
}
