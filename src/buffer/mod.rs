//! Line-oriented text buffer.
//!
//! Lines live in an arena and are addressed by [`LineId`] handles. The
//! sequence order is kept by `prev`/`next` links, and the structural ends
//! are stored explicitly and repaired by every unlink, so `first()` and
//! `last()` are O(1) and never point at a removed line.
//!
//! The buffer always holds at least one line. Only the last line may be
//! incomplete (lack a terminator); it is the line successive writes append to.

pub mod line;

use std::fmt;
use std::io;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

use tracing::trace;

use crate::error::{Result, ScriptError};
use crate::format::Format;

pub use line::{Line, LineId, split_lines};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    line: Option<Line>,
}

#[derive(Debug, Clone)]
pub struct LineBuffer {
    slots: Vec<Slot>,
    free: Vec<u32>,
    head: LineId,
    tail: LineId,
    len: usize,
    format: Arc<Format>,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::with_format(Format::default())
    }

    pub fn with_format(format: Format) -> Self {
        let format = Arc::new(format);
        let placeholder = Line::new(String::new(), format.clone());
        let id = LineId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                line: Some(placeholder),
            }],
            free: Vec::new(),
            head: id,
            tail: id,
            len: 1,
            format,
        }
    }

    /// Format applied to lines created from now on.
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Replaces the current format. Existing lines keep the format they were
    /// created with.
    pub fn set_format(&mut self, format: Format) -> Format {
        let previous = std::mem::replace(&mut self.format, Arc::new(format));
        Arc::unwrap_or_clone(previous)
    }

    pub fn get(&self, id: LineId) -> Option<&Line> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.line.as_ref())
    }

    fn get_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.line.as_mut())
    }

    pub fn contains(&self, id: LineId) -> bool {
        self.get(id).is_some()
    }

    pub fn first(&self) -> LineId {
        self.head
    }

    pub fn last(&self) -> LineId {
        self.tail
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.get(id).and_then(Line::next)
    }

    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.get(id).and_then(Line::prev)
    }

    /// Number of lines, including an incomplete last line.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the buffer holds nothing but the empty placeholder line.
    pub fn is_empty(&self) -> bool {
        self.len == 1 && self[self.head].is_empty()
    }

    /// Total length of raw content across all lines.
    pub fn content_len(&self) -> usize {
        self.lines().map(|(_, line)| line.len()).sum()
    }

    pub fn lines(&self) -> Lines<'_> {
        Lines {
            buffer: self,
            cursor: Some(self.head),
        }
    }

    /// Raw content of every line, concatenated without formatting.
    pub fn content(&self) -> String {
        self.lines().map(|(_, line)| line.content()).collect()
    }

    /// Offset of the first character of `id` within the concatenated content.
    pub fn pos(&self, id: LineId) -> Option<usize> {
        let mut pos = 0;
        for (current, line) in self.lines() {
            if current == id {
                return Some(pos);
            }
            pos += line.len();
        }
        None
    }

    /// Zero-based index of `id` in the sequence.
    pub fn lineno(&self, id: LineId) -> Option<usize> {
        self.lines().position(|(current, _)| current == id)
    }

    /// Resolves a line index, counting from the end when negative.
    pub fn line_at(&self, index: isize) -> Result<LineId> {
        let resolved = resolve_index(index, self.len)
            .ok_or_else(|| ScriptError::index_out_of_range(index, self.len))?;
        self.lines()
            .nth(resolved)
            .map(|(id, _)| id)
            .ok_or_else(|| ScriptError::index_out_of_range(index, self.len))
    }

    /// Appends `text`, returning the line that received its final segment.
    pub fn write(&mut self, text: &str) -> LineId {
        self.write_span(text).map_or(self.tail, |(_, last)| last)
    }

    /// Appends `text`, returning the first and last lines that received
    /// content, or `None` when `text` is empty.
    ///
    /// A leading segment without a preceding terminator continues the
    /// incomplete last line. Every other segment starts a new line under
    /// the current format.
    pub fn write_span(&mut self, text: &str) -> Option<(LineId, LineId)> {
        let segments = split_lines(text);
        let (leading, rest) = segments.split_first()?;
        trace!(bytes = text.len(), segments = segments.len(), "write");

        let tail = self.tail;
        let format = self.format.clone();
        let first = if self[tail].is_complete() {
            self.push_after(tail, (*leading).to_string(), format.clone())
        } else {
            let line = &mut self[tail];
            if line.is_empty() {
                line.format = format.clone();
            }
            line.content.push_str(leading);
            tail
        };

        let mut last = first;
        for segment in rest {
            last = self.push_after(last, (*segment).to_string(), format.clone());
        }
        Some((first, last))
    }

    /// Splices `text` at character offset `offset`, counting from the end of
    /// the content when negative.
    ///
    /// Line breaks in `text` split the target line; the new lines inherit its
    /// format. Returns the line and column just past the inserted text.
    pub fn insert(&mut self, offset: isize, text: &str) -> Result<(LineId, usize)> {
        let total = self.content_len();
        let pos = resolve_index(offset, total).ok_or_else(|| ScriptError::out_of_range(offset, total))?;
        let (id, col) = self
            .locate(pos)
            .ok_or_else(|| ScriptError::out_of_range(offset, total))?;

        let line = &self[id];
        if !line.content.is_char_boundary(col) {
            return Err(ScriptError::NotCharBoundary { offset: pos });
        }
        if text.is_empty() {
            return Ok((id, col));
        }
        trace!(offset = pos, bytes = text.len(), "insert");

        let mut spliced = String::with_capacity(line.len() + text.len());
        spliced.push_str(&line.content[..col]);
        spliced.push_str(text);
        spliced.push_str(&line.content[col..]);
        let format = line.format.clone();

        let end = col + text.len();
        let segments = split_lines(&spliced);
        let mut current = id;
        let mut start = 0;
        let mut cursor = None;
        for (i, segment) in segments.iter().enumerate() {
            if i == 0 {
                self[id].content = (*segment).to_string();
            } else {
                current = self.push_after(current, (*segment).to_string(), format.clone());
            }
            if cursor.is_none() && end < start + segment.len() {
                cursor = Some((current, end - start));
            }
            start += segment.len();
        }
        Ok(cursor.unwrap_or_else(|| (current, self[current].len())))
    }

    /// Splices `text` at byte column `col` of line `id`.
    ///
    /// Same as [`insert`](Self::insert) at the line's offset plus `col`;
    /// `col` must fall inside the line's content, terminator included.
    pub fn insert_at(&mut self, id: LineId, col: usize, text: &str) -> Result<(LineId, usize)> {
        let len = self.get(id).ok_or(ScriptError::StaleLine)?.len();
        if col >= len {
            return Err(ScriptError::out_of_range(col as isize, len));
        }
        let pos = self.pos(id).ok_or(ScriptError::StaleLine)?;
        self.insert((pos + col) as isize, text)
    }

    /// Removes `length` lines starting at `index`. A negative `length`
    /// removes the lines ending at `index` instead. Returns the first removed
    /// line, or `None` when the range is empty or out of bounds.
    pub fn cut(&mut self, index: isize, length: isize) -> Option<Line> {
        let index = resolve_index(index, self.len)?;
        let (start, count) = if length >= 0 {
            (index, (length as usize).min(self.len - index))
        } else {
            let count = length.unsigned_abs().min(index + 1);
            (index + 1 - count, count)
        };
        if count == 0 {
            return None;
        }
        trace!(start, count, "cut");

        let doomed: Vec<LineId> = self.lines().skip(start).take(count).map(|(id, _)| id).collect();
        let mut first = None;
        for id in doomed {
            let line = self.remove(id);
            if first.is_none() {
                first = line;
            }
        }
        first
    }

    /// Removes blank lines from the head. Returns how many were removed.
    pub fn ltrim(&mut self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let count = self.lines().take_while(|(_, line)| line.is_blank()).count();
        self.cut(0, count as isize);
        count
    }

    /// Removes blank lines from the tail. Returns how many were removed.
    pub fn rtrim(&mut self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let blanks: Vec<bool> = self.lines().map(|(_, line)| line.is_blank()).collect();
        let count = blanks.iter().rev().take_while(|blank| **blank).count();
        self.cut(-1, -(count as isize));
        count
    }

    pub fn trim(&mut self) -> usize {
        self.ltrim() + self.rtrim()
    }

    /// Inserts an empty, completed line before `id`.
    pub fn prepend_line(&mut self, id: LineId) -> Result<LineId> {
        let format = self.get(id).ok_or(ScriptError::StaleLine)?.format.clone();
        let new = self.alloc(Line::new(String::new(), format));
        self.link_before(id, new);
        Ok(new)
    }

    /// Completes `id` and inserts an empty line after it.
    pub fn append_line(&mut self, id: LineId) -> Result<LineId> {
        let format = self.get(id).ok_or(ScriptError::StaleLine)?.format.clone();
        Ok(self.push_after(id, String::new(), format))
    }

    /// Renders every line with the format it was created under.
    pub fn render(&self) -> String {
        self.lines().map(|(_, line)| line.render()).collect()
    }

    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for (_, line) in self.lines() {
            out.write_all(line.render().as_bytes())?;
        }
        Ok(())
    }

    /// Verifies link symmetry, boundary references, the line count, and that
    /// only the last line is incomplete.
    pub fn check_invariants(&self) -> bool {
        if self.get(self.head).and_then(Line::prev).is_some() {
            return false;
        }
        let mut count = 0;
        let mut prev = None;
        let mut cursor = Some(self.head);
        while let Some(id) = cursor {
            let Some(line) = self.get(id) else {
                return false;
            };
            if line.prev != prev || (line.next.is_some() && !line.is_complete()) {
                return false;
            }
            count += 1;
            prev = Some(id);
            cursor = line.next;
        }
        prev == Some(self.tail) && count == self.len
    }

    pub(crate) fn set_content(&mut self, id: LineId, content: String) -> Result<()> {
        let line = self.get_mut(id).ok_or(ScriptError::StaleLine)?;
        line.content = content;
        Ok(())
    }

    /// Drops everything from byte offset `offset` on. Lines starting at or
    /// past `offset` are removed, except that the buffer keeps its
    /// placeholder line.
    pub(crate) fn truncate(&mut self, offset: usize) {
        let Some((id, col)) = self.locate(offset) else {
            return;
        };
        trace!(offset, "truncate");
        let mut cursor = self.next(id);
        while let Some(next) = cursor {
            cursor = self.next(next);
            self.remove(next);
        }
        if col == 0 && self.prev(id).is_some() {
            self.remove(id);
        } else {
            self[id].content.truncate(col);
        }
    }

    /// Unlinks and frees `id`. Re-anchors the boundaries and, if the buffer
    /// would be left without lines, installs an empty placeholder.
    pub(crate) fn remove(&mut self, id: LineId) -> Option<Line> {
        let (prev, next) = {
            let line = self.get(id)?;
            (line.prev, line.next)
        };
        match prev {
            Some(p) => self[p].next = next,
            None => {
                if let Some(n) = next {
                    self.head = n;
                }
            }
        }
        match next {
            Some(n) => self[n].prev = prev,
            None => {
                if let Some(p) = prev {
                    self.tail = p;
                }
            }
        }

        let mut line = self.release(id)?;
        line.prev = None;
        line.next = None;
        self.len -= 1;

        if self.len == 0 {
            let placeholder = self.alloc(Line::new(String::new(), self.format.clone()));
            self.head = placeholder;
            self.tail = placeholder;
            self.len = 1;
        }
        Some(line)
    }

    fn locate(&self, pos: usize) -> Option<(LineId, usize)> {
        let mut start = 0;
        for (id, line) in self.lines() {
            if pos < start + line.len() {
                return Some((id, pos - start));
            }
            start += line.len();
        }
        None
    }

    fn push_after(&mut self, anchor: LineId, content: String, format: Arc<Format>) -> LineId {
        let id = self.alloc(Line::new(content, format));
        self.link_after(anchor, id);
        id
    }

    fn link_after(&mut self, anchor: LineId, id: LineId) {
        let next = self[anchor].next;
        self[anchor].complete();
        self[anchor].next = Some(id);
        self[id].prev = Some(anchor);
        self[id].next = next;
        match next {
            Some(n) => {
                self[n].prev = Some(id);
                self[id].complete();
            }
            None => self.tail = id,
        }
        self.len += 1;
    }

    fn link_before(&mut self, anchor: LineId, id: LineId) {
        let prev = self[anchor].prev;
        self[id].complete();
        self[id].next = Some(anchor);
        self[id].prev = prev;
        self[anchor].prev = Some(id);
        match prev {
            Some(p) => self[p].next = Some(id),
            None => self.head = id,
        }
        self.len += 1;
    }

    fn alloc(&mut self, line: Line) -> LineId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.line = Some(line);
                LineId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    line: Some(line),
                });
                LineId { index, generation: 0 }
            }
        }
    }

    fn release(&mut self, id: LineId) -> Option<Line> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let line = slot.line.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(line)
    }
}

/// Panics on a stale handle, like slice indexing out of bounds.
impl Index<LineId> for LineBuffer {
    type Output = Line;

    fn index(&self, id: LineId) -> &Line {
        match self.get(id) {
            Some(line) => line,
            None => panic!("stale line handle {id:?}"),
        }
    }
}

impl IndexMut<LineId> for LineBuffer {
    fn index_mut(&mut self, id: LineId) -> &mut Line {
        match self.get_mut(id) {
            Some(line) => line,
            None => panic!("stale line handle {id:?}"),
        }
    }
}

impl fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, line) in self.lines() {
            f.write_str(&line.render())?;
        }
        Ok(())
    }
}

/// Lines of a buffer in sequence order.
pub struct Lines<'a> {
    buffer: &'a LineBuffer,
    cursor: Option<LineId>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = (LineId, &'a Line);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let line = self.buffer.get(id)?;
        self.cursor = line.next;
        Some((id, line))
    }
}

/// Maps `index` into `[0, len)`, counting from `len` when negative.
fn resolve_index(index: isize, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())?
    } else {
        index as usize
    };
    (resolved < len).then_some(resolved)
}
