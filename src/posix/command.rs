use std::fmt;

use crate::syntax::{OptionKey, OptionMap, OptionValue, is_reserved_word, quote};

/// A simple command: name, options, then positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    options: OptionMap,
    args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: OptionMap::new(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn option(mut self, key: impl Into<OptionKey>, value: impl Into<OptionValue>) -> Self {
        self.options.set(key, value);
        self
    }

    pub fn options(mut self, options: OptionMap) -> Self {
        for (key, value) in options.iter() {
            self.options.set(key.clone(), value.clone());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `name [flags...] [args...]`, with the name and each argument quoted
    /// unless already quoted or free of special characters. A reserved word
    /// in name position (`[[`, `!`) is kept bare so the shell still parses it.
    pub fn render(&self) -> String {
        let name = if is_reserved_word(&self.name) {
            self.name.clone()
        } else {
            quote(&self.name)
        };
        let mut parts = vec![name];
        parts.extend(self.options.to_tokens());
        parts.extend(self.args.iter().map(|arg| quote(arg)));
        parts.join(" ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
