//! Per-view stacks of open elements.
//!
//! Every view key owns an independent stack, created on first push. Closers are
//! matched against the innermost open element of their own view only, so
//! dialects living in different views can interleave without their closers
//! colliding.

use std::collections::BTreeMap;
use std::fmt;

use crate::shared::{Name, Position, StartElement, Style};

/// Snapshot of an emitted, non-self-closing start tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenElement {
    pub style: Style,
    pub view: String,
    pub name: Name,
    pub start_position: Position,
}

impl From<&StartElement> for OpenElement {
    fn from(elem: &StartElement) -> Self {
        Self {
            style: elem.style,
            view: elem.view.clone(),
            name: elem.name.clone(),
            start_position: elem.start_position,
        }
    }
}

/// Pop on a view whose stack is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackUnderflow {
    pub view: String,
}

impl fmt::Display for StackUnderflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no open element in view {:?}", self.view)
    }
}

impl std::error::Error for StackUnderflow {}

#[derive(Clone, Debug, Default)]
pub struct ViewStacks {
    stacks: BTreeMap<String, Vec<OpenElement>>,
    max_depth: usize,
}

impl ViewStacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: OpenElement) {
        let stack = self.stacks.entry(entry.view.clone()).or_default();
        stack.push(entry);
        self.max_depth = self.max_depth.max(stack.len());
    }

    pub fn pop(&mut self, view: &str) -> Result<OpenElement, StackUnderflow> {
        self.stacks
            .get_mut(view)
            .and_then(Vec::pop)
            .ok_or_else(|| StackUnderflow {
                view: view.to_string(),
            })
    }

    /// Open elements of `view`, outermost first.
    pub fn open_elements(&self, view: &str) -> &[OpenElement] {
        self.stacks.get(view).map(Vec::as_slice).unwrap_or(&[])
    }

    /// View of the most recently opened element of `style` still on any stack.
    pub fn innermost_view_of(&self, style: Style) -> Option<&str> {
        self.stacks
            .values()
            .filter_map(|stack| stack.iter().rev().find(|open| open.style == style))
            .max_by_key(|open| open.start_position.byte_offset)
            .map(|open| open.view.as_str())
    }

    /// Deepest any single view has been.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// All still-open elements, views in sorted key order, outermost first.
    pub fn unclosed(&self) -> impl Iterator<Item = &OpenElement> + '_ {
        self.stacks.values().flatten()
    }
}
