use crate::evaluator::Error;
use crate::grammar::{NodeKind, SyntaxTree};
use crate::strings;
use crate::types::{Int, Value};

/// Converts a syntax tree into a value. Problems with individual literals become
/// `Error` values in place, so the rest of the tree is still read.
pub fn read(tree: &SyntaxTree) -> Value {
    match tree.kind {
        NodeKind::Number => read_number(&tree.contents),
        NodeKind::String => read_string(&tree.contents),
        NodeKind::Identifier => Value::new_symbol(&tree.contents),
        NodeKind::SExpr => Value::SExpr(read_forms(tree)),
        NodeKind::QExpr => Value::QExpr(read_forms(tree)),
        NodeKind::Comment | NodeKind::Punctuation => Error::Unreadable(tree.kind).into(),
    }
}

/// Reads every expression child of a group, in order.
pub fn read_forms(tree: &SyntaxTree) -> Vec<Value> {
    tree.expressions().map(read).collect()
}

fn read_number(text: &str) -> Value {
    text.parse::<Int>()
        .map(Value::Number)
        .unwrap_or_else(|_| Error::InvalidNumber.into())
}

fn read_string(literal: &str) -> Value {
    let payload = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    strings::build_string(payload)
        .map(Value::Str)
        .unwrap_or_else(|e| Error::BadEscape(e).into())
}
