// String literals understand a small, fixed set of backslash escapes. Reading
// decodes them and printing re-applies them, so both directions share one table.

use bimap::BiMap;
use std::fmt;
use std::str::Chars;

lazy_static! {
    static ref ESCAPES: BiMap<char, char> = {
        let mut m = BiMap::new();
        m.insert('\\', '\\');
        m.insert('"', '"');
        m.insert('n', '\n');
        m.insert('t', '\t');
        m.insert('r', '\r');
        m.insert('0', '\0');
        m.insert('a', '\u{7}');
        m.insert('b', '\u{8}');
        m.insert('f', '\u{c}');
        m.insert('v', '\u{b}');
        m
    };
}

struct StringBuilder<'a> {
    chars: Chars<'a>,
}

impl<'a> StringBuilder<'a> {
    fn new(src: &'a str) -> Self {
        Self { chars: src.chars() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    UnknownEscape(char),
    UnexpectedSingleBackslash,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::UnknownEscape(c) => write!(f, "unknown escape \\{}", c),
            BuildError::UnexpectedSingleBackslash => write!(f, "trailing backslash"),
        }
    }
}

impl Iterator for StringBuilder<'_> {
    type Item = std::result::Result<char, BuildError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match self.chars.next()? {
            '\\' => match self.chars.next() {
                None => Err(BuildError::UnexpectedSingleBackslash),
                Some(c) => ESCAPES
                    .get_by_left(&c)
                    .copied()
                    .ok_or(BuildError::UnknownEscape(c)),
            },
            c => Ok(c),
        };
        Some(result)
    }
}

/// Decodes the body of a string literal, without its enclosing quotes.
pub(crate) fn build_string(src: &str) -> Result<String, BuildError> {
    StringBuilder::new(src).collect()
}

pub(crate) fn string_repr(src: &str) -> String {
    let mut output = String::with_capacity(src.len() + 2);
    output.push('"');
    for c in src.chars() {
        match ESCAPES.get_by_right(&c) {
            Some(&escape) => {
                output.push('\\');
                output.push(escape);
            }
            None => output.push(c),
        }
    }
    output.push('"');
    output
}
