//! Script assembly sessions.
//!
//! A [`Script`] owns one buffer, its heredoc delimiter counter and its
//! function registry. Builder calls on a `Script` start fresh statements and
//! hand back an [`OpenStatement`], which is the only way to chain onto the
//! statement just written. Dropping the `OpenStatement` closes it.

use std::fmt;
use std::io;

use crate::buffer::{LineBuffer, split_lines};
use crate::error::Result;
use crate::format::Format;
use crate::posix::builtins;
use crate::posix::{Command, DelimiterCounter, Heredoc, HeredocOptions, Redirect};
use crate::registry::{FunctionRegistry, Registration};
use crate::statement::{ChainOp, Statement, StatementKind};

#[derive(Debug, Clone, Default)]
pub struct Script {
    buffer: LineBuffer,
    heredocs: DelimiterCounter,
    functions: FunctionRegistry,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: Format) -> Self {
        Self {
            buffer: LineBuffer::with_format(format),
            ..Self::default()
        }
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut LineBuffer {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> LineBuffer {
        self.buffer
    }

    pub fn format(&self) -> &Format {
        self.buffer.format()
    }

    pub fn set_format(&mut self, format: Format) -> Format {
        self.buffer.set_format(format)
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn write(&mut self, text: &str) -> &mut Self {
        self.buffer.write(text);
        self
    }

    pub fn writeln(&mut self, text: &str) -> &mut Self {
        self.buffer.write(text);
        self.buffer.write("\n");
        self
    }

    /// Writes `text` as a statement of the given kind.
    pub fn statement(&mut self, kind: StatementKind, text: &str) -> Statement {
        Statement::write(&mut self.buffer, kind, text)
    }

    /// Chains `other` onto `statement` in this script's buffer.
    pub fn chain(&mut self, statement: &mut Statement, other: Statement, op: ChainOp) -> Result<()> {
        statement.chain(&mut self.buffer, other, op)
    }

    /// Runs `f` with `format` as the current format, then restores the
    /// previous one.
    pub fn using_format<R>(&mut self, format: Format, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.buffer.set_format(format);
        let result = f(self);
        self.buffer.set_format(previous);
        result
    }

    /// Indents one level for the duration of `f`.
    pub fn indent<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let level = self.format().indent_level() + 1;
        let format = self.format().clone().with_indent_level(level);
        self.using_format(format, f)
    }

    /// Shifts the indent level by `delta` for the duration of `f`.
    pub fn indent_by<R>(&mut self, delta: i64, f: impl FnOnce(&mut Self) -> R) -> Result<R> {
        let mut format = self.format().clone();
        format.indent_by(delta)?;
        Ok(self.using_format(format, f))
    }

    /// Drops all indentation for the duration of `f`.
    pub fn outdent<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let format = self.format().clone().with_indent_level(0);
        self.using_format(format, f)
    }

    /// Runs `f` against an empty buffer and returns what it rendered.
    ///
    /// The capture starts from the current format at indent level zero.
    /// Heredoc numbering and function definitions are shared with `self`.
    pub fn capture(&mut self, f: impl FnOnce(&mut Self)) -> String {
        let format = self.format().clone().with_indent_level(0);
        self.capture_with(format, f)
    }

    fn capture_with(&mut self, format: Format, f: impl FnOnce(&mut Self)) -> String {
        let previous = std::mem::replace(&mut self.buffer, LineBuffer::with_format(format));
        f(self);
        let captured = std::mem::replace(&mut self.buffer, previous);
        if captured.is_empty() {
            return String::new();
        }
        captured.render()
    }

    pub fn execute(&mut self, command: Command) -> OpenStatement<'_> {
        let statement = Statement::write(
            &mut self.buffer,
            StatementKind::Command,
            &format!("{}\n", command.render()),
        );
        OpenStatement::new(self, statement)
    }

    pub fn redirect(&mut self, redirect: Redirect) -> OpenStatement<'_> {
        let statement = Statement::write(
            &mut self.buffer,
            StatementKind::Redirect,
            &format!("{}\n", redirect.render()),
        );
        OpenStatement::new(self, statement)
    }

    /// Redirects stdout to `path`, or to `/dev/null`.
    pub fn to(&mut self, path: Option<&str>) -> OpenStatement<'_> {
        self.redirect(Redirect::to(path))
    }

    /// Redirects stdin from `path`.
    pub fn from(&mut self, path: &str) -> OpenStatement<'_> {
        self.redirect(Redirect::from_file(path))
    }

    /// Writes a heredoc whose body is whatever `body` writes.
    ///
    /// Without `outdent` the body is written verbatim at column zero. With
    /// `outdent` the body is indented one level past the current one using
    /// tabs, which the shell strips for `<<-`. The closing delimiter is
    /// always at column zero.
    pub fn heredoc(&mut self, options: HeredocOptions, body: impl FnOnce(&mut Self)) -> OpenStatement<'_> {
        let statement = self.write_heredoc(options, body);
        OpenStatement::new(self, statement)
    }

    fn write_heredoc(&mut self, options: HeredocOptions, body: impl FnOnce(&mut Self)) -> Statement {
        let outdent = options.outdent;
        let heredoc = Heredoc::with_options(options, &mut self.heredocs);

        let body_format = if outdent {
            let mut format = self
                .format()
                .clone()
                .with_strip(false)
                .with_indent_level(self.format().indent_level() + 1);
            format.indent_str = "\t".to_string();
            format.tab = None;
            format
        } else {
            Format::literal()
        };
        let text = self.capture_with(body_format, body);
        let heredoc = heredoc.body(split_lines(&text));

        let opener = self.buffer.write_span(&format!("{}\n", heredoc.opener()));
        let rest = self.using_format(Format::literal(), |s| s.buffer.write_span(&heredoc.render_body()));
        match (opener, rest) {
            (Some((first, joint)), Some((_, last))) => {
                Statement::from_lines(StatementKind::Heredoc, first, joint, last)
            }
            _ => Statement::empty(StatementKind::Heredoc),
        }
    }

    /// Defines a shell function from whatever `body` writes, indented one
    /// level past the current one. A body that writes nothing becomes `:`.
    ///
    /// The definition is written in place, so heredocs in the body keep
    /// their delimiters at column zero. Defining the same name again with
    /// the same raw text is a no-op, with different text an error; either
    /// way the second attempt is rolled back, delimiter numbering included.
    pub fn function(&mut self, name: &str, body: impl FnOnce(&mut Self)) -> Result<Registration> {
        let header = builtins::function_header(name)?;
        let start = self.buffer.content_len();
        let heredocs = self.heredocs.clone();

        self.writeln(&header);
        let opened = self.buffer.content_len();
        self.indent(body);
        if self.buffer.content_len() == opened {
            self.indent(|s| {
                s.writeln(":");
            });
        } else if !self.buffer[self.buffer.last()].is_complete() {
            self.write("\n");
        }
        self.writeln("}");

        let definition = self.buffer.content()[start..].to_string();
        let registration = self.functions.define(name, &definition);
        if !matches!(registration, Ok(Registration::Defined)) {
            self.buffer.truncate(start);
            self.heredocs = heredocs;
        }
        registration
    }

    pub fn assign(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        let line = builtins::assign(name, value)?;
        Ok(self.writeln(&line))
    }

    pub fn export(&mut self, name: &str, value: Option<&str>) -> Result<&mut Self> {
        let line = builtins::export(name, value)?;
        Ok(self.writeln(&line))
    }

    /// Writes one `set -o`/`set +o` line per option.
    pub fn set_options<'o>(&mut self, options: impl IntoIterator<Item = (&'o str, bool)>) -> &mut Self {
        for (name, enabled) in options {
            self.writeln(&builtins::set_option(name, enabled));
        }
        self
    }

    pub fn exit(&mut self, status: Option<i32>) -> &mut Self {
        self.writeln(&builtins::exit(status))
    }

    pub fn return_(&mut self, status: Option<i32>) -> &mut Self {
        self.writeln(&builtins::return_(status))
    }

    pub fn comment(&mut self, text: &str) -> &mut Self {
        self.writeln(&builtins::comment(text))
    }

    pub fn render(&self) -> String {
        self.buffer.render()
    }

    pub fn write_to<W: io::Write>(&self, out: &mut W) -> Result<()> {
        self.buffer.write_to(out)?;
        Ok(())
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.buffer, f)
    }
}

/// The statement most recently written to a [`Script`], still open for
/// chaining. Every chaining call validates the statement before writing, so
/// a failed call leaves the script untouched.
#[derive(Debug)]
pub struct OpenStatement<'a> {
    script: &'a mut Script,
    statement: Statement,
}

impl<'a> OpenStatement<'a> {
    fn new(script: &'a mut Script, statement: Statement) -> Self {
        Self { script, statement }
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// `... | command`
    pub fn pipe(self, command: Command) -> Result<Self> {
        let text = format!("{}\n", command.render());
        self.chain_text(StatementKind::Command, ChainOp::Pipe, &text)
    }

    pub fn redirect(self, redirect: Redirect) -> Result<Self> {
        let text = format!("{}\n", redirect.render());
        self.chain_text(StatementKind::Redirect, ChainOp::Redirect, &text)
    }

    pub fn to(self, path: Option<&str>) -> Result<Self> {
        self.redirect(Redirect::to(path))
    }

    pub fn from(self, path: &str) -> Result<Self> {
        self.redirect(Redirect::from_file(path))
    }

    pub fn heredoc(mut self, options: HeredocOptions, body: impl FnOnce(&mut Script)) -> Result<Self> {
        self.statement.check_chainable(&self.script.buffer)?;
        let next = self.script.write_heredoc(options, body);
        self.statement.chain(&mut self.script.buffer, next, ChainOp::Redirect)?;
        Ok(self)
    }

    /// Closes the statement and returns its handle.
    pub fn finish(self) -> Statement {
        self.statement
    }

    fn chain_text(mut self, kind: StatementKind, op: ChainOp, text: &str) -> Result<Self> {
        self.statement.check_chainable(&self.script.buffer)?;
        let next = Statement::write(&mut self.script.buffer, kind, text);
        self.statement.chain(&mut self.script.buffer, next, op)?;
        Ok(self)
    }
}
