//! POSIX quoting rules for generated script text.
//!
//! These are heuristics for text the crate itself emits, not a shell parser.
//! Tokens that already form a complete quoted span are passed through, so
//! callers can pre-quote anything the heuristics would get wrong.

/// Characters with special meaning to the shell (XCU 2.2 Quoting).
pub const SPECIAL_CHARS: &[char] = &[
    '|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\'', ' ', '\t', '\n', '*', '?', '[',
    '#', '~', '=', '%',
];

/// Reserved words (XCU 2.4) plus the common bash extensions.
pub const RESERVED_WORDS: &[&str] = &[
    "!", "{", "}", "case", "do", "done", "elif", "else", "esac", "fi", "for", "if", "in", "then",
    "until", "while", "[[", "]]", "function", "select",
];

pub fn needs_quoting(token: &str) -> bool {
    token.contains(SPECIAL_CHARS)
}

/// True if `token` is entirely enclosed in double quotes or in apostrophes.
pub fn is_quoted(token: &str) -> bool {
    token.len() >= 2
        && ((token.starts_with('"') && token.ends_with('"'))
            || (token.starts_with('\'') && token.ends_with('\'')))
}

/// Double-quotes `token` if it is unquoted and has special characters.
///
/// Embedded double quotes are escaped. Nothing else is, so parameter
/// expansions like `$path` still expand inside the result.
pub fn quote(token: &str) -> String {
    if is_quoted(token) || !needs_quoting(token) {
        return token.to_string();
    }
    format!("\"{}\"", token.replace('"', "\\\""))
}

/// Single-quotes `token` if it has special characters.
///
/// Apostrophes become `'\''`; the empty `''` pairs this leaves at the ends
/// are dropped.
pub fn single_quote(token: &str) -> String {
    if !needs_quoting(token) {
        return token.to_string();
    }
    let wrapped = format!("'{}'", token.replace('\'', "'\\''"));

    let mut out = String::with_capacity(wrapped.len());
    let mut i = 0;
    while i < wrapped.len() {
        let rest = &wrapped[i..];
        if i == 0 && rest.starts_with("''") {
            i += 2;
        } else if rest.starts_with("'''") {
            out.push('\'');
            i += 3;
        } else if let Some(c) = rest.chars().next() {
            out.push(c);
            i += c.len_utf8();
        }
    }
    out
}

/// True if `word` is a shell name: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_name(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// True for reserved words and for `name:` labels.
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word) || word.strip_suffix(':').is_some_and(is_name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKey {
    /// Used verbatim as the flag name.
    Text(String),
    /// Identifier-style key; underscores become hyphens.
    Symbol(String),
}

impl OptionKey {
    pub fn symbol(name: impl Into<String>) -> Self {
        OptionKey::Symbol(name.into())
    }

    /// The command-line flag for this key, e.g. `--dry-run` or `-v`.
    pub fn flag(&self) -> String {
        let name = match self {
            OptionKey::Text(s) => s.clone(),
            OptionKey::Symbol(s) => s.replace('_', "-"),
        };
        if name.starts_with('-') {
            name
        } else if name.chars().count() > 1 {
            format!("--{name}")
        } else {
            format!("-{name}")
        }
    }
}

impl From<&str> for OptionKey {
    fn from(s: &str) -> Self {
        OptionKey::Text(s.to_string())
    }
}

impl From<String> for OptionKey {
    fn from(s: String) -> Self {
        OptionKey::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag(bool),
    Absent,
    Value(String),
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Flag(b)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Value(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Value(s)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Value(n.to_string())
    }
}

impl From<u32> for OptionValue {
    fn from(n: u32) -> Self {
        OptionValue::Value(n.to_string())
    }
}

impl<T: Into<OptionValue>> From<Option<T>> for OptionValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(OptionValue::Absent, Into::into)
    }
}

/// Insertion-ordered option set for a single command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap {
    entries: Vec<(OptionKey, OptionValue)>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an earlier entry for the same key.
    pub fn set(&mut self, key: impl Into<OptionKey>, value: impl Into<OptionValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<OptionKey>, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(OptionKey, OptionValue)> {
        self.entries.iter()
    }

    pub fn to_tokens(&self) -> Vec<String> {
        option_map_to_tokens(self)
    }
}

impl<K: Into<OptionKey>, V: Into<OptionValue>> FromIterator<(K, V)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OptionMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

/// Converts options into command-line tokens.
///
/// Flags are sorted by plain string order, which puts `--long` flags before
/// `-s` short flags so a short flag given for the same option comes last and
/// wins under typical option parsing. `true` yields the bare flag, `false`
/// and absent values yield nothing, anything else yields the flag followed by
/// its quoted value.
pub fn option_map_to_tokens(map: &OptionMap) -> Vec<String> {
    let mut flags: Vec<(String, &OptionValue)> = map.iter().map(|(k, v)| (k.flag(), v)).collect();
    flags.sort_by(|a, b| a.0.cmp(&b.0));

    let mut tokens = Vec::new();
    for (flag, value) in flags {
        match value {
            OptionValue::Flag(true) => tokens.push(flag),
            OptionValue::Flag(false) | OptionValue::Absent => {}
            OptionValue::Value(v) => {
                tokens.push(flag);
                tokens.push(quote(v));
            }
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_special_char_needs_quoting() {
        for c in SPECIAL_CHARS {
            assert!(needs_quoting(&c.to_string()), "{:?} should need quoting", c);
        }
        assert!(!needs_quoting("abc"));
        assert!(!needs_quoting("a-b_c.d/e:f"));
    }

    #[test]
    fn single_quote_escapes_apostrophes() {
        assert_eq!(single_quote("cat"), "cat");
        assert_eq!(single_quote("'''"), r"\'\'\'");
        assert_eq!(single_quote("ab'"), r"'ab'\'");
        assert_eq!(single_quote("a'b"), r"'a'\''b'");
        assert_eq!(single_quote("'ab"), r"\''ab'");
        assert_eq!(single_quote("\"cat\""), "'\"cat\"'");
        assert_eq!(single_quote("'cat'"), r"\''cat'\'");
    }

    #[test]
    fn symbol_keys_swap_underscores() {
        assert_eq!(OptionKey::symbol("dry_run").flag(), "--dry-run");
        assert_eq!(OptionKey::from("dry_run").flag(), "--dry_run");
        assert_eq!(OptionKey::from("v").flag(), "-v");
        assert_eq!(OptionKey::from("-x").flag(), "-x");
        assert_eq!(OptionKey::from("--already").flag(), "--already");
    }

    #[test]
    fn set_replaces_existing_key() {
        let mut map = OptionMap::new();
        map.set("a", true);
        map.set("a", false);
        assert_eq!(map.iter().count(), 1);
        assert!(map.to_tokens().is_empty());
    }
}
