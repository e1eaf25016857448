//! Statements and the boundary rewrite that chains them.
//!
//! A [`Statement`] is a span of lines in a [`LineBuffer`]. It does not own
//! or borrow those lines; it holds handles that stop resolving once the
//! lines are cut, so operating on a cut statement fails instead of touching
//! whatever now occupies the buffer.

use tracing::debug;

use crate::buffer::{LineBuffer, LineId};
use crate::error::{Result, ScriptError};
use crate::format::split_terminator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOp {
    /// `a | b`
    Pipe,
    /// `a b`, for appending redirections and heredoc operators.
    Redirect,
}

impl ChainOp {
    pub fn separator(self) -> &'static str {
        match self {
            ChainOp::Pipe => " | ",
            ChainOp::Redirect => " ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Command,
    Redirect,
    Heredoc,
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    first: LineId,
    /// Line that receives chained text. The last line for most statements,
    /// the operator line for heredocs.
    joint: LineId,
    last: LineId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    kind: StatementKind,
    span: Option<Span>,
}

impl Statement {
    pub fn empty(kind: StatementKind) -> Self {
        Self { kind, span: None }
    }

    /// Writes `text` to `buffer` and returns the statement covering it.
    pub fn write(buffer: &mut LineBuffer, kind: StatementKind, text: &str) -> Self {
        match buffer.write_span(text) {
            Some((first, last)) => {
                let joint = if kind == StatementKind::Heredoc { first } else { last };
                Self::from_lines(kind, first, joint, last)
            }
            None => Self::empty(kind),
        }
    }

    pub(crate) fn from_lines(kind: StatementKind, first: LineId, joint: LineId, last: LineId) -> Self {
        Self {
            kind,
            span: Some(Span { first, joint, last }),
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_none()
    }

    pub fn first(&self) -> Option<LineId> {
        self.span.map(|s| s.first)
    }

    pub fn last(&self) -> Option<LineId> {
        self.span.map(|s| s.last)
    }

    /// True if every line the statement refers to is still in `buffer`.
    pub fn is_live(&self, buffer: &LineBuffer) -> bool {
        self.span.is_some_and(|s| {
            buffer.contains(s.first) && buffer.contains(s.joint) && buffer.contains(s.last)
        })
    }

    /// Rendered text of the statement's lines.
    pub fn render(&self, buffer: &LineBuffer) -> Result<String> {
        let Some(span) = self.span else {
            return Ok(String::new());
        };
        if !self.is_live(buffer) {
            return Err(ScriptError::StaleStatement);
        }
        let mut out = String::new();
        let mut cursor = Some(span.first);
        while let Some(id) = cursor {
            let line = buffer.get(id).ok_or(ScriptError::StaleStatement)?;
            out.push_str(&line.render());
            if id == span.last {
                break;
            }
            cursor = line.next();
        }
        Ok(out)
    }

    /// Checks that the next statement written to `buffer` can be chained
    /// onto this one: the statement is live, ends the buffer, and is
    /// terminated so the next write starts a fresh line.
    pub fn check_chainable(&self, buffer: &LineBuffer) -> Result<()> {
        let span = self.span.ok_or(ScriptError::EmptyStatement)?;
        if !self.is_live(buffer) {
            return Err(ScriptError::StaleStatement);
        }
        if span.last != buffer.last() || !buffer[span.last].is_complete() {
            return Err(ScriptError::NotAdjacent);
        }
        Ok(())
    }

    /// Merges `other` into the end of this statement.
    ///
    /// The joint line loses its terminator and trailing whitespace, then gets
    /// the separator, the first line of `other`, and that line's terminator.
    /// The first line of `other` is removed and any remaining lines of
    /// `other` become the tail of this statement. No other line is touched.
    /// Fails without modifying anything if either statement is empty or
    /// stale, or if `other` does not start on the line after this one ends.
    pub fn chain(&mut self, buffer: &mut LineBuffer, other: Statement, op: ChainOp) -> Result<()> {
        let a = self.span.ok_or(ScriptError::EmptyStatement)?;
        let b = other.span.ok_or(ScriptError::EmptyStatement)?;
        if !self.is_live(buffer) || !other.is_live(buffer) {
            return Err(ScriptError::StaleStatement);
        }
        if buffer.next(a.last) != Some(b.first) {
            return Err(ScriptError::NotAdjacent);
        }

        let (head, head_term) = split_terminator(buffer[a.joint].content());
        let (tail, tail_term) = split_terminator(buffer[b.first].content());
        let terminator = match tail_term {
            Some(term) => term,
            None if a.joint != a.last => head_term.unwrap_or("\n"),
            None => "",
        };
        let merged = format!(
            "{}{}{}{}",
            head.trim_end_matches(|c: char| c.is_ascii_whitespace()),
            op.separator(),
            tail,
            terminator
        );
        debug!(?op, merged = %merged.trim_end(), "chain");

        buffer.set_content(a.joint, merged)?;
        buffer.remove(b.first);
        let last = if b.last != b.first { b.last } else { a.last };
        self.span = Some(Span { last, ..a });
        Ok(())
    }
}
