mod common;
use common::*;

use shscript::{ChainOp, Format, LineBuffer, ScriptError, Statement, StatementKind};

fn command(buffer: &mut LineBuffer, text: &str) -> Statement {
    Statement::write(buffer, StatementKind::Command, text)
}

#[test]
fn pipe_rewrites_only_the_boundary() {
    let mut buffer = LineBuffer::new();
    buffer.write("echo start\n");
    let mut a = command(&mut buffer, "cat a\n");
    let b = command(&mut buffer, "grep b\n");

    a.chain(&mut buffer, b, ChainOp::Pipe).unwrap();
    assert_eq!(buffer.render(), "echo start\ncat a | grep b\n");
    assert_eq!(a.render(&buffer).unwrap(), "cat a | grep b\n");
    assert_eq!(buffer.len(), 2);
    assert!(buffer.check_invariants());
}

#[test]
fn chain_law() {
    let mut buffer = LineBuffer::new();
    let mut a = command(&mut buffer, "cat a\n");
    let b = command(&mut buffer, "grep b\n");
    a.chain(&mut buffer, b, ChainOp::Pipe).unwrap();
    assert_eq!(buffer.render(), "cat a | grep b\n");
}

#[test]
fn redirect_appends_with_a_space() {
    let mut buffer = LineBuffer::new();
    let mut a = command(&mut buffer, "cat a  \n");
    let b = Statement::write(&mut buffer, StatementKind::Redirect, "2>&1\n");
    a.chain(&mut buffer, b, ChainOp::Redirect).unwrap();
    assert_eq!(buffer.render(), "cat a 2>&1\n");
}

#[test]
fn chained_line_keeps_the_head_format() {
    let mut buffer = LineBuffer::with_format(Format::default().with_indent_level(1));
    let mut a = command(&mut buffer, "cat a\n");
    buffer.set_format(Format::default().with_indent_level(3));
    let b = command(&mut buffer, "grep b\n");
    a.chain(&mut buffer, b, ChainOp::Pipe).unwrap();
    assert_eq!(buffer.render(), "  cat a | grep b\n");
}

#[test]
fn chaining_multi_line_statements() {
    let mut buffer = LineBuffer::new();
    let mut a = command(&mut buffer, "cat\n");
    let heredoc = Statement::write(&mut buffer, StatementKind::Heredoc, "<<EOF\nbody\nEOF\n");
    a.chain(&mut buffer, heredoc, ChainOp::Redirect).unwrap();
    assert_eq!(buffer.render(), "cat <<EOF\nbody\nEOF\n");
    assert_eq!(a.last(), Some(buffer.last()));

    let out = Statement::write(&mut buffer, StatementKind::Redirect, "> out\n");
    a.chain(&mut buffer, out, ChainOp::Redirect).unwrap();
    assert_eq!(buffer.render(), "cat <<EOF > out\nbody\nEOF\n");
    assert_eq!(line_contents(&buffer).len(), 3);
}

#[test]
fn unterminated_tail_stays_unterminated() {
    let mut buffer = LineBuffer::new();
    let mut a = command(&mut buffer, "cat a\n");
    let b = command(&mut buffer, "grep b");
    a.chain(&mut buffer, b, ChainOp::Pipe).unwrap();
    assert_eq!(buffer.render(), "cat a | grep b");
    buffer.write(" -v\n");
    assert_eq!(buffer.render(), "cat a | grep b -v\n");
}

#[test]
fn empty_statements_cannot_be_chained() {
    let mut buffer = LineBuffer::new();
    let mut empty = Statement::empty(StatementKind::Command);
    let b = command(&mut buffer, "grep b\n");
    let err = empty.chain(&mut buffer, b.clone(), ChainOp::Pipe).unwrap_err();
    assert!(matches!(err, ScriptError::EmptyStatement));
    assert!(empty.is_empty());

    let mut a = b;
    let before = a.clone();
    let err = a
        .chain(&mut buffer, Statement::empty(StatementKind::Command), ChainOp::Pipe)
        .unwrap_err();
    assert!(matches!(err, ScriptError::EmptyStatement));
    assert_eq!(a, before);
    assert_eq!(buffer.render(), "grep b\n");
}

#[test]
fn writing_nothing_gives_an_empty_statement() {
    let mut buffer = LineBuffer::new();
    let statement = command(&mut buffer, "");
    assert!(statement.is_empty());
    assert_eq!(statement.render(&buffer).unwrap(), "");
    assert!(statement.check_chainable(&buffer).is_err());
}

#[test]
fn stale_statements_are_rejected() {
    let mut buffer = LineBuffer::new();
    let mut a = command(&mut buffer, "cat a\n");
    buffer.cut(0, 1);
    let b = command(&mut buffer, "grep b\n");

    assert!(!a.is_live(&buffer));
    assert!(matches!(a.render(&buffer), Err(ScriptError::StaleStatement)));
    let err = a.chain(&mut buffer, b, ChainOp::Pipe).unwrap_err();
    assert!(matches!(err, ScriptError::StaleStatement));
    assert_eq!(buffer.render(), "grep b\n");
}

#[test]
fn statements_must_be_adjacent() {
    let mut buffer = LineBuffer::new();
    let mut a = command(&mut buffer, "cat a\n");
    buffer.write("echo between\n");
    assert!(matches!(a.check_chainable(&buffer), Err(ScriptError::NotAdjacent)));

    let b = command(&mut buffer, "grep b\n");
    let err = a.chain(&mut buffer, b, ChainOp::Pipe).unwrap_err();
    assert!(matches!(err, ScriptError::NotAdjacent));
    assert_eq!(buffer.render(), "cat a\necho between\ngrep b\n");
}

#[test]
fn partial_last_line_is_not_chainable() {
    let mut buffer = LineBuffer::new();
    let a = command(&mut buffer, "cat a");
    assert!(matches!(a.check_chainable(&buffer), Err(ScriptError::NotAdjacent)));
    buffer.write("\n");
    assert!(a.check_chainable(&buffer).is_ok());
}
