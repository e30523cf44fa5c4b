//! Turns source text into a [`SyntaxTree`]. The tree keeps punctuation and comments
//! so that it mirrors the source; the reader skips them.

use regex::{Captures, Regex};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Number,
    String,
    Identifier,
    Comment,
    Punctuation,
    SExpr,
    QExpr,
}

impl NodeKind {
    pub fn is_expression(self) -> bool {
        match self {
            NodeKind::Comment | NodeKind::Punctuation => false,
            _ => true,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Identifier => "identifier",
            NodeKind::Comment => "comment",
            NodeKind::Punctuation => "punctuation",
            NodeKind::SExpr => "s-expression",
            NodeKind::QExpr => "q-expression",
        };
        write!(f, "{}", name)
    }
}

/// 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    const START: Position = Position { line: 1, column: 1 };

    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub kind: NodeKind,
    /// Source text of a leaf; empty for groups.
    pub contents: String,
    pub position: Position,
    pub children: Vec<SyntaxTree>,
}

impl SyntaxTree {
    fn leaf(kind: NodeKind, contents: &str, position: Position) -> Self {
        Self {
            kind,
            contents: String::from(contents),
            position,
            children: Vec::new(),
        }
    }

    fn group(kind: NodeKind, position: Position) -> Self {
        Self {
            kind,
            contents: String::new(),
            position,
            children: Vec::new(),
        }
    }

    /// The children the reader turns into values.
    pub fn expressions(&self) -> impl Iterator<Item = &SyntaxTree> {
        self.children.iter().filter(|child| child.kind.is_expression())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: Position,
}

impl ParseError {
    fn new(message: String, position: Position) -> Self {
        Self { message, position }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

#[derive(Debug)]
enum Token<'a> {
    Whitespace,
    Comment(&'a str),
    StringLiteral(&'a str),
    Open(char),
    Close(char),
    Atom(&'a str),
}

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(
        r#"(?x)
            ^(?:
                (?P<whitespace>\s+)
                |(?P<comment>;[^\r\n]*)
                |(?P<string>"(?:\\(?s:.)|[^\\"])*"?)
                |(?P<open>[(\[])
                |(?P<close>[)\]])
                |(?P<atom>[a-zA-Z0-9_+\-*/\\=<>!&]+)
            )
        "#
    )
    .expect("token regex is valid");
}

fn create_token<'a>(caps: &Captures<'a>) -> Option<Token<'a>> {
    let first_char = |s: &str| s.chars().next();
    if caps.name("whitespace").is_some() {
        Some(Token::Whitespace)
    } else if let Some(m) = caps.name("comment") {
        Some(Token::Comment(m.as_str()))
    } else if let Some(m) = caps.name("string") {
        Some(Token::StringLiteral(m.as_str()))
    } else if let Some(m) = caps.name("open") {
        first_char(m.as_str()).map(Token::Open)
    } else if let Some(m) = caps.name("close") {
        first_char(m.as_str()).map(Token::Close)
    } else {
        caps.name("atom").map(|m| Token::Atom(m.as_str()))
    }
}

fn is_balanced_string(literal: &str) -> bool {
    let bytes = literal.as_bytes();
    if bytes.len() < 2 || bytes[bytes.len() - 1] != b'"' {
        return false;
    }
    let trailing_backslashes = bytes
        .iter()
        .rev()
        .skip(1)
        .take_while(|&&byte| byte == b'\\')
        .count();
    trailing_backslashes % 2 == 0
}

fn is_number(atom: &str) -> bool {
    let digits = atom.strip_prefix('-').unwrap_or(atom);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

const fn closer_for(kind: NodeKind) -> char {
    match kind {
        NodeKind::QExpr => ']',
        _ => ')',
    }
}

/// Groups still waiting for their closing bracket. The bottom entry is the root.
struct TreeBuilder {
    stack: Vec<SyntaxTree>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![SyntaxTree::group(NodeKind::SExpr, Position::START)],
        }
    }

    fn attach(&mut self, node: SyntaxTree) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    fn push(&mut self, token: Token, position: Position) -> Result<(), ParseError> {
        match token {
            Token::Whitespace => {}
            Token::Comment(text) => self.attach(SyntaxTree::leaf(NodeKind::Comment, text, position)),
            Token::StringLiteral(text) => {
                if !is_balanced_string(text) {
                    return Err(ParseError::new(
                        String::from("unterminated string literal"),
                        position,
                    ));
                }
                self.attach(SyntaxTree::leaf(NodeKind::String, text, position));
            }
            Token::Atom(text) => {
                let kind = match is_number(text) {
                    true => NodeKind::Number,
                    false => NodeKind::Identifier,
                };
                self.attach(SyntaxTree::leaf(kind, text, position));
            }
            Token::Open(bracket) => {
                let kind = match bracket {
                    '[' => NodeKind::QExpr,
                    _ => NodeKind::SExpr,
                };
                let mut group = SyntaxTree::group(kind, position);
                group.children.push(SyntaxTree::leaf(
                    NodeKind::Punctuation,
                    &bracket.to_string(),
                    position,
                ));
                self.stack.push(group);
            }
            Token::Close(bracket) => {
                if self.stack.len() < 2 {
                    return Err(ParseError::new(
                        format!("unmatched '{}'", bracket),
                        position,
                    ));
                }
                let mut group = match self.stack.pop() {
                    Some(group) => group,
                    None => unreachable!(),
                };
                let expected = closer_for(group.kind);
                if bracket != expected {
                    return Err(ParseError::new(
                        format!("expected '{}' but found '{}'", expected, bracket),
                        position,
                    ));
                }
                group.children.push(SyntaxTree::leaf(
                    NodeKind::Punctuation,
                    &bracket.to_string(),
                    position,
                ));
                self.attach(group);
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<SyntaxTree, ParseError> {
        if self.stack.len() > 1 {
            if let Some(unclosed) = self.stack.pop() {
                return Err(ParseError::new(
                    format!("missing '{}' before end of input", closer_for(unclosed.kind)),
                    unclosed.position,
                ));
            }
        }
        self.stack
            .pop()
            .ok_or_else(|| ParseError::new(String::from("empty parse stack"), Position::START))
    }
}

/// Parses a whole program. The root is an s-expression group without punctuation
/// whose expression children are the top-level forms.
pub fn parse(input: &str) -> Result<SyntaxTree, ParseError> {
    let mut builder = TreeBuilder::new();
    let mut position = Position::START;
    let mut rest = input;
    while !rest.is_empty() {
        let caps = TOKEN_RE.captures(rest);
        let token = caps.as_ref().and_then(create_token);
        let (token, length) = match (token, caps.as_ref().and_then(|c| c.get(0))) {
            (Some(token), Some(whole)) => (token, whole.end()),
            _ => {
                let unexpected = rest.chars().next().unwrap_or_default();
                return Err(ParseError::new(
                    format!("unexpected character '{}'", unexpected),
                    position,
                ));
            }
        };
        builder.push(token, position)?;
        position.advance(&rest[..length]);
        rest = &rest[length..];
    }
    builder.finish()
}
