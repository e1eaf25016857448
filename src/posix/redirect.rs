use std::fmt;

use crate::syntax::quote;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Duplicate another file descriptor, rendered `&N`.
    Fd(u32),
    Path(String),
}

impl From<u32> for RedirectTarget {
    fn from(fd: u32) -> Self {
        RedirectTarget::Fd(fd)
    }
}

impl From<&str> for RedirectTarget {
    fn from(path: &str) -> Self {
        RedirectTarget::Path(path.to_string())
    }
}

impl From<String> for RedirectTarget {
    fn from(path: String) -> Self {
        RedirectTarget::Path(path)
    }
}

/// `[source]operator target`, e.g. `2>&1`, `> out.log`, `< input`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    source: Option<u32>,
    target: RedirectTarget,
    operator: String,
}

impl Redirect {
    pub fn new(source: Option<u32>, target: impl Into<RedirectTarget>, operator: impl Into<String>) -> Self {
        Self {
            source,
            target: target.into(),
            operator: operator.into(),
        }
    }

    /// Stdout to `path`, or to `/dev/null` when no path is given.
    pub fn to(path: Option<&str>) -> Self {
        Self::new(None, path.unwrap_or("/dev/null"), ">")
    }

    pub fn append_to(path: &str) -> Self {
        Self::new(None, path, ">>")
    }

    /// Stdin from `path`.
    pub fn from_file(path: &str) -> Self {
        Self::new(None, path, "<")
    }

    /// `source>&target`
    pub fn dup(source: u32, target: u32) -> Self {
        Self::new(Some(source), target, ">")
    }

    pub fn render(&self) -> String {
        let source = self.source.map(|fd| fd.to_string()).unwrap_or_default();
        let target = match &self.target {
            RedirectTarget::Fd(fd) => format!("&{fd}"),
            RedirectTarget::Path(path) => format!(" {}", quote(path)),
        };
        format!("{}{}{}", source, self.operator, target)
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
