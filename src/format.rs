//! Line formatting rules.
//!
//! A [`Format`] is attached to every line when the line is created and is
//! applied lazily when the buffer is rendered. Changing the buffer's current
//! format never touches lines that already exist.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Format {
    pub indent_str: String,
    indent_level: usize,
    /// Replacement for line terminators. `None` keeps the source terminator.
    pub eol: Option<String>,
    pub lstrip: bool,
    pub rstrip: bool,
    /// Replacement for literal tab characters. `None` leaves tabs alone.
    pub tab: Option<String>,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            indent_str: "  ".to_string(),
            indent_level: 0,
            eol: None,
            lstrip: false,
            rstrip: false,
            tab: None,
        }
    }
}

impl Format {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format that renders content exactly as written.
    pub fn literal() -> Self {
        Self {
            indent_str: String::new(),
            ..Self::default()
        }
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn set_indent_level(&mut self, level: i64) -> Result<()> {
        if level < 0 {
            return Err(ScriptError::NegativeIndent(level));
        }
        self.indent_level = level as usize;
        Ok(())
    }

    /// Adjusts the indent level by `delta`, failing if the result would be negative.
    pub fn indent_by(&mut self, delta: i64) -> Result<()> {
        self.set_indent_level(self.indent_level as i64 + delta)
    }

    /// The full indentation prefix, `indent_str` repeated `indent_level` times.
    pub fn indent(&self) -> String {
        self.indent_str.repeat(self.indent_level)
    }

    /// Sets the indent string and resets the level to one.
    pub fn with_indent(mut self, indent_str: impl Into<String>) -> Self {
        self.indent_str = indent_str.into();
        self.indent_level = 1;
        self
    }

    pub fn with_indent_level(mut self, level: usize) -> Self {
        self.indent_level = level;
        self
    }

    pub fn with_eol(mut self, eol: impl Into<String>) -> Self {
        self.eol = Some(eol.into());
        self
    }

    pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = Some(tab.into());
        self
    }

    pub fn with_lstrip(mut self, lstrip: bool) -> Self {
        self.lstrip = lstrip;
        self
    }

    pub fn with_rstrip(mut self, rstrip: bool) -> Self {
        self.rstrip = rstrip;
        self
    }

    pub fn with_strip(self, strip: bool) -> Self {
        self.with_lstrip(strip).with_rstrip(strip)
    }

    /// Renders raw line content.
    ///
    /// Strip, indent, terminator replacement and tab expansion are applied in
    /// that order; tab expansion sees the indent and terminator too. Content
    /// without a terminator is still in progress, so right-strip leaves its
    /// trailing whitespace alone until the terminator arrives. Empty content
    /// renders as nothing, indent included.
    pub fn render(&self, content: &str) -> String {
        if content.is_empty() {
            return String::new();
        }
        let (mut body, terminator) = split_terminator(content);

        if self.lstrip {
            body = body.trim_start_matches(|c: char| c.is_ascii_whitespace());
        }
        if self.rstrip && terminator.is_some() {
            body = body.trim_end_matches(|c: char| c.is_ascii_whitespace());
        }

        let mut out = self.indent();
        out.push_str(body);
        if let Some(term) = terminator {
            out.push_str(self.eol.as_deref().unwrap_or(term));
        }

        match &self.tab {
            Some(tab) => out.replace('\t', tab),
            None => out,
        }
    }
}

/// Splits trailing `\n` or `\r\n` off `content`.
pub fn split_terminator(content: &str) -> (&str, Option<&str>) {
    if let Some(body) = content.strip_suffix("\r\n") {
        (body, Some(&content[body.len()..]))
    } else if let Some(body) = content.strip_suffix('\n') {
        (body, Some(&content[body.len()..]))
    } else {
        (content, None)
    }
}
