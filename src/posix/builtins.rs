//! Renderers for the handful of special builtins scripts commonly need.
//! Each returns a single line of text without its terminator.

use crate::error::{Result, ScriptError};
use crate::syntax::{is_name, quote};

fn check_name(name: &str) -> Result<()> {
    if is_name(name) {
        Ok(())
    } else {
        Err(ScriptError::InvalidName(name.to_string()))
    }
}

/// `name=value`
pub fn assign(name: &str, value: &str) -> Result<String> {
    check_name(name)?;
    Ok(format!("{}={}", name, quote(value)))
}

/// `export name` or `export name=value`
pub fn export(name: &str, value: Option<&str>) -> Result<String> {
    check_name(name)?;
    Ok(match value {
        Some(v) => format!("export {}={}", name, quote(v)),
        None => format!("export {}", name),
    })
}

/// `set -o name` to enable a shell option, `set +o name` to disable it.
pub fn set_option(name: &str, enabled: bool) -> String {
    let sign = if enabled { '-' } else { '+' };
    format!("set {}o {}", sign, name)
}

pub fn exit(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exit {}", code),
        None => "exit".to_string(),
    }
}

pub fn return_(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("return {}", code),
        None => "return".to_string(),
    }
}

/// Prefixes every line of `text` with `# `.
pub fn comment(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|line| if line.is_empty() { "#".to_string() } else { format!("# {}", line) })
        .collect();
    lines.join("\n")
}

/// `name() {`, the opening line of a function definition.
pub fn function_header(name: &str) -> Result<String> {
    check_name(name)?;
    Ok(format!("{}() {{", name))
}
