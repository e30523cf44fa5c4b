use crate::strings::string_repr;
use crate::types::{Closure, Function, Value};
use itertools::Itertools;
use std::fmt;

pub const BUILTIN_PLACEHOLDER: &str = "<builtin>";

pub fn render(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::Str(s) => string_repr(s),
        Value::Error(message) => format!("Error: {}", message),
        Value::Symbol(name) => name.to_string(),
        Value::Function(Function::Builtin(_)) => String::from(BUILTIN_PLACEHOLDER),
        Value::Function(Function::Closure(closure)) => closure.to_string(),
        Value::SExpr(items) => render_list(items, '(', ')'),
        Value::QExpr(items) => render_list(items, '[', ']'),
    }
}

fn render_list(items: &[Value], open: char, close: char) -> String {
    format!("{}{}{}", open, items.iter().map(render).join(" "), close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render(self))
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(\\ [{}] {})",
            self.params.iter().join(" "),
            render_list(&self.body, '[', ']')
        )
    }
}
