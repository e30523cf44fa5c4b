use crate::environment::Environment;
use crate::evaluator;
use derive_more::Deref;
use itertools::Itertools;
use std::fmt;
use std::ops::{RangeFrom, RangeInclusive};
use std::ptr;

pub type Int = i64;

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(String::from(name))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    pub name: &'static str,
    pub expected: Arity,
    pub got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Function {} expected {} args but got {}",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &'static str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name,
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "{}", r.start())
                } else {
                    write!(f, "{} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Number,
    String,
    Error,
    Symbol,
    Function,
    SExpr,
    QExpr,
}

impl TypeName {
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeName::Number => "Number",
            TypeName::String => "String",
            TypeName::Error => "Error",
            TypeName::Symbol => "Symbol",
            TypeName::Function => "Function",
            TypeName::SExpr => "S-Expression",
            TypeName::QExpr => "Q-Expression",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An argument of the wrong type was passed to a builtin. `position` counts from 1.
#[derive(Debug)]
pub struct TypeMismatch {
    pub name: &'static str,
    pub position: usize,
    pub expected: &'static str,
    pub got: TypeName,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Function {} argument {} expected {} but got {}",
            self.name, self.position, self.expected, self.got
        )
    }
}

impl TypeMismatch {
    pub(crate) fn new(
        name: &'static str,
        position: usize,
        expected: &'static str,
        got: &Value,
    ) -> Self {
        Self {
            name,
            position,
            expected,
            got: got.type_name(),
        }
    }
}

pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&Environment, Vec<Value>) -> evaluator::Result,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "builtin #<{}>", self.name)
    }
}

/// A user-defined function. `scope` is private to this value: cloning a closure
/// copies its bindings into a fresh scope with the same parent.
pub struct Closure {
    pub params: Vec<Symbol>,
    pub body: Vec<Value>,
    pub scope: Environment,
}

impl Closure {
    pub(crate) fn new(params: Vec<Symbol>, body: Vec<Value>, scope: Environment) -> Self {
        Self {
            params,
            body,
            scope,
        }
    }

    pub fn arity(&self) -> Arity {
        Arity::exactly(self.params.len())
    }
}

impl Clone for Closure {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            body: self.body.clone(),
            scope: self.scope.duplicate(),
        }
    }
}

impl fmt::Debug for Closure {
    // Not derived: the scope chain can be arbitrarily deep and may well contain this Closure.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Closure{{params: [{}], body: {:?}}}",
            self.params.iter().join(" "),
            self.body
        )
    }
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.body == other.body
    }
}

#[derive(Debug, Clone)]
pub enum Function {
    Builtin(&'static Builtin),
    Closure(Closure),
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Builtin(x), Function::Builtin(y)) => ptr::eq(*x, *y),
            (Function::Closure(x), Function::Closure(y)) => x == y,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(Int),
    Str(String),
    Error(String),
    Symbol(Symbol),
    Function(Function),
    SExpr(Vec<Value>),
    QExpr(Vec<Value>),
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Number(b as Int)
    }
}

impl Value {
    pub fn type_name(&self) -> TypeName {
        match self {
            Value::Number(_) => TypeName::Number,
            Value::Str(_) => TypeName::String,
            Value::Error(_) => TypeName::Error,
            Value::Symbol(_) => TypeName::Symbol,
            Value::Function(_) => TypeName::Function,
            Value::SExpr(_) => TypeName::SExpr,
            Value::QExpr(_) => TypeName::QExpr,
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            Value::Error(_) => true,
            _ => false,
        }
    }

    /// `None` for values that cannot be used as a condition.
    pub fn truthy(&self) -> Option<bool> {
        match self {
            Value::Number(n) => Some(*n != 0),
            Value::QExpr(items) => Some(!items.is_empty()),
            Value::Function(_) => Some(true),
            Value::Str(_) | Value::Error(_) | Value::Symbol(_) | Value::SExpr(_) => None,
        }
    }

    pub fn new_symbol(name: &str) -> Self {
        Value::Symbol(Symbol::from(name))
    }

    pub fn empty_sexpr() -> Self {
        Value::SExpr(Vec::new())
    }

    pub(crate) fn as_number(&self, name: &'static str, position: usize) -> Result<Int, TypeMismatch> {
        match self {
            Value::Number(n) => Ok(*n),
            _ => Err(TypeMismatch::new(name, position, TypeName::Number.as_str(), self)),
        }
    }

    pub(crate) fn as_str(&self, name: &'static str, position: usize) -> Result<&str, TypeMismatch> {
        match self {
            Value::Str(s) => Ok(s),
            _ => Err(TypeMismatch::new(name, position, TypeName::String.as_str(), self)),
        }
    }

    pub(crate) fn into_qexpr(
        self,
        name: &'static str,
        position: usize,
    ) -> Result<Vec<Value>, TypeMismatch> {
        match self {
            Value::QExpr(items) => Ok(items),
            _ => Err(TypeMismatch::new(name, position, TypeName::QExpr.as_str(), &self)),
        }
    }

    pub(crate) fn into_symbol(
        self,
        name: &'static str,
        position: usize,
    ) -> Result<Symbol, TypeMismatch> {
        match self {
            Value::Symbol(s) => Ok(s),
            _ => Err(TypeMismatch::new(name, position, TypeName::Symbol.as_str(), &self)),
        }
    }
}
