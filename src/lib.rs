//! Incremental assembly of POSIX shell scripts.
//!
//! Text is written into a [`LineBuffer`] one fragment at a time. Each line
//! remembers the [`Format`] that was current when it was created and is
//! rendered lazily. [`Statement`]s track spans of lines so that pipes and
//! redirections can be appended after the fact by rewriting a single line.

pub mod buffer;
pub mod error;
pub mod format;
pub mod posix;
pub mod registry;
pub mod script;
pub mod statement;
pub mod syntax;

pub use buffer::{Line, LineBuffer, LineId};
pub use error::{Result, ScriptError};
pub use format::Format;
pub use posix::{Command, Heredoc, HeredocOptions, Redirect};
pub use registry::{FunctionRegistry, Registration};
pub use script::{OpenStatement, Script};
pub use statement::{ChainOp, Statement, StatementKind};
pub use syntax::{OptionMap, quote};
