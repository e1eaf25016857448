#![allow(dead_code)]

use std::fs;
use std::process::Command;

use shscript::{LineBuffer, Script};

/// Writes each fragment to a fresh buffer and returns the rendered text.
pub fn render_writes(fragments: &[&str]) -> String {
    let mut buffer = LineBuffer::new();
    for fragment in fragments {
        buffer.write(fragment);
    }
    buffer.render()
}

/// Raw content of every line, in order.
pub fn line_contents(buffer: &LineBuffer) -> Vec<String> {
    buffer.lines().map(|(_, line)| line.content().to_string()).collect()
}

pub fn buffer_of(text: &str) -> LineBuffer {
    let mut buffer = LineBuffer::new();
    buffer.write(text);
    buffer
}

/// Persists `script` to a temp dir and runs it under `/bin/sh`.
pub fn run_sh(script: &Script) -> (String, String, i32) {
    run_sh_text(&script.render())
}

pub fn run_sh_text(text: &str) -> (String, String, i32) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("script.sh");
    fs::write(&path, text).expect("Failed to write temp script");

    let output = Command::new("sh")
        .current_dir(dir.path())
        .arg(&path)
        .output()
        .expect("Failed to execute sh");

    let stdout = String::from_utf8_lossy(&output.stdout).replace("\r\n", "\n");
    let stderr = String::from_utf8_lossy(&output.stderr).replace("\r\n", "\n");
    (stdout, stderr, output.status.code().unwrap_or(0))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
