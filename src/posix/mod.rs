//! Builders for concrete POSIX shell constructs.

pub mod builtins;
pub mod command;
pub mod heredoc;
pub mod redirect;

pub use command::Command;
pub use heredoc::{DelimiterCounter, Heredoc, HeredocOptions};
pub use redirect::{Redirect, RedirectTarget};
