use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeredocOptions {
    /// Explicit delimiter. A `HEREDOC_<n>` delimiter is allocated when unset.
    pub delimiter: Option<String>,
    /// Use `<<-` so the shell strips leading tabs from the body.
    pub outdent: bool,
    /// Quote the delimiter so the body is not expanded.
    pub quote: bool,
}

impl HeredocOptions {
    pub fn delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: Some(delimiter.into()),
            ..Self::default()
        }
    }

    pub fn with_outdent(mut self, outdent: bool) -> Self {
        self.outdent = outdent;
        self
    }

    pub fn with_quote(mut self, quote: bool) -> Self {
        self.quote = quote;
        self
    }
}

/// Per-document source of default heredoc delimiters.
#[derive(Debug, Clone, Default)]
pub struct DelimiterCounter {
    next: usize,
}

impl DelimiterCounter {
    pub fn next_delimiter(&mut self) -> String {
        let delimiter = format!("HEREDOC_{}", self.next);
        self.next += 1;
        debug!(%delimiter, "allocated heredoc delimiter");
        delimiter
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heredoc {
    delimiter: String,
    outdent: bool,
    quote: bool,
    body: Vec<String>,
}

impl Heredoc {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            outdent: false,
            quote: false,
            body: Vec::new(),
        }
    }

    /// Builds a heredoc from `options`, drawing a default delimiter from
    /// `counter` when none is given.
    pub fn with_options(options: HeredocOptions, counter: &mut DelimiterCounter) -> Self {
        let delimiter = options.delimiter.unwrap_or_else(|| counter.next_delimiter());
        Self {
            outdent: options.outdent,
            quote: options.quote,
            ..Self::new(delimiter)
        }
    }

    pub fn outdent(mut self, outdent: bool) -> Self {
        self.outdent = outdent;
        self
    }

    pub fn quote(mut self, quote: bool) -> Self {
        self.quote = quote;
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    pub fn body<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The redirection operator and delimiter, e.g. `<<-"EOF"`.
    pub fn opener(&self) -> String {
        let dash = if self.outdent { "-" } else { "" };
        if self.quote {
            format!("<<{}\"{}\"", dash, self.delimiter)
        } else {
            format!("<<{}{}", dash, self.delimiter)
        }
    }

    /// Body lines, each terminated, followed by the bare delimiter line.
    pub fn render_body(&self) -> String {
        let mut out = String::new();
        for line in &self.body {
            out.push_str(line);
            if !line.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push_str(&self.delimiter);
        out.push('\n');
        out
    }

    pub fn render(&self) -> String {
        format!("{}\n{}", self.opener(), self.render_body())
    }
}

impl fmt::Display for Heredoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
