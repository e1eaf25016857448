use std::sync::Arc;

use crate::format::{Format, split_terminator};

/// Stable handle to a line in a [`LineBuffer`](super::LineBuffer).
///
/// The generation makes handles to removed lines fail lookups instead of
/// silently resolving to whatever line reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

#[derive(Debug, Clone)]
pub struct Line {
    pub(crate) content: String,
    pub(crate) format: Arc<Format>,
    pub(crate) prev: Option<LineId>,
    pub(crate) next: Option<LineId>,
}

impl Line {
    pub(crate) fn new(content: String, format: Arc<Format>) -> Self {
        Self {
            content,
            format,
            prev: None,
            next: None,
        }
    }

    /// Raw, unformatted content including any terminator.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// True if content ends with a line terminator.
    pub fn is_complete(&self) -> bool {
        self.content.ends_with('\n')
    }

    /// True if content is whitespace apart from its terminator.
    pub fn is_blank(&self) -> bool {
        split_terminator(&self.content).0.trim().is_empty()
    }

    pub fn prev(&self) -> Option<LineId> {
        self.prev
    }

    pub fn next(&self) -> Option<LineId> {
        self.next
    }

    pub fn render(&self) -> String {
        self.format.render(&self.content)
    }

    pub(crate) fn complete(&mut self) {
        if !self.is_complete() {
            self.content.push('\n');
        }
    }
}

/// Splits `text` after every `\n`, keeping the terminators.
///
/// `"abc\nxyz\n"` gives `["abc\n", "xyz\n"]` and `"\nabc"` gives `["\n", "abc"]`.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}
