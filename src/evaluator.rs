use crate::environment::Environment;
use crate::grammar::{NodeKind, ParseError};
use crate::strings::BuildError;
use crate::types::{BadArgCount, Builtin, Closure, Function, Symbol, TypeMismatch, Value};
use itertools::Itertools;
use std::fmt;
use std::io;

pub type Result<T = Value> = std::result::Result<T, Error>;

/// Everything that can go wrong while reading or evaluating. These never escape
/// to callers of [`evaluate`]: they are rendered into `Value::Error`.
#[derive(Debug)]
pub enum Error {
    UndefinedSymbol(Symbol),
    NotCallable,
    BadArgCount(BadArgCount),
    TypeMismatch(TypeMismatch),
    DivideByZero,
    EmptyList(&'static str),
    DefMismatch { symbols: usize, values: usize },
    InvalidNumber,
    BadEscape(BuildError),
    Unreadable(NodeKind),
    Parse(ParseError),
    Io { path: String, source: io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UndefinedSymbol(s) => write!(f, "undefined symbol: {}", s),
            Error::NotCallable => write!(f, "not a function"),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::TypeMismatch(e) => write!(f, "{}", e),
            Error::DivideByZero => write!(f, "division by zero"),
            Error::EmptyList(name) => {
                write!(f, "Function {} expected a non-empty Q-Expression", name)
            }
            Error::DefMismatch { symbols, values } => write!(
                f,
                "Function def cannot bind {} symbols to {} values",
                symbols, values
            ),
            Error::InvalidNumber => write!(f, "invalid number"),
            Error::BadEscape(e) => write!(f, "invalid string literal: {}", e),
            Error::Unreadable(kind) => write!(f, "cannot read {} node as a value", kind),
            Error::Parse(e) => write!(f, "parse error: {}", e),
            Error::Io { path, source } => write!(f, "could not load {}: {}", path, source),
        }
    }
}

impl From<TypeMismatch> for Error {
    fn from(t: TypeMismatch) -> Self {
        Self::TypeMismatch(t)
    }
}

impl From<BadArgCount> for Error {
    fn from(e: BadArgCount) -> Self {
        Self::BadArgCount(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<Error> for Value {
    fn from(e: Error) -> Self {
        Value::Error(e.to_string())
    }
}

/// Evaluates `value` in `env`. Symbols are looked up, s-expressions are reduced and
/// applied, and everything else evaluates to itself.
pub fn evaluate(env: &Environment, value: Value) -> Value {
    log::trace!("evaluate {}", value);
    match value {
        Value::Symbol(symbol) => env.fetch(&symbol).unwrap_or_else(Value::from),
        Value::SExpr(items) => evaluate_sexpr(env, items),
        _ => value,
    }
}

fn evaluate_sexpr(env: &Environment, items: Vec<Value>) -> Value {
    let mut evaluated = Vec::with_capacity(items.len());
    for item in items {
        let value = evaluate(env, item);
        if value.is_error() {
            return value;
        }
        evaluated.push(value);
    }
    match evaluated.len() {
        0 => Value::SExpr(evaluated),
        1 => evaluated.remove(0),
        _ => {
            let mut evaluated = evaluated.into_iter();
            match evaluated.next() {
                Some(Value::Function(function)) => call(env, function, evaluated.collect()),
                _ => Error::NotCallable.into(),
            }
        }
    }
}

pub(crate) fn pretty_print_args(args: &[Value]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

/// Applies `function` to already-evaluated `args`.
pub fn call(env: &Environment, function: Function, args: Vec<Value>) -> Value {
    let result = match function {
        Function::Builtin(builtin) => call_builtin(env, builtin, args),
        Function::Closure(closure) => call_closure(closure, args),
    };
    result.unwrap_or_else(Value::from)
}

pub fn call_builtin(env: &Environment, builtin: &Builtin, args: Vec<Value>) -> Result {
    builtin.arity.validate_for(args.len(), builtin.name)?;
    log::trace!("Call {} with {}", builtin.name, pretty_print_args(&args));
    let result = (builtin.fn_ptr)(env, args);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", builtin.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", builtin.name, e),
    }
    result
}

/// Binds parameters positionally in the closure's own scope and evaluates the body
/// there. The argument count must match the parameter count exactly.
fn call_closure(closure: Closure, args: Vec<Value>) -> Result {
    log::trace!("Call {} with {}", closure, pretty_print_args(&args));
    closure.arity().validate_for(args.len(), "lambda")?;
    let Closure {
        params,
        body,
        scope,
    } = closure;
    for (param, arg) in params.into_iter().zip(args) {
        scope.put(param, arg);
    }
    Ok(evaluate(&scope, Value::SExpr(body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::types::Int;
    use std::rc::Rc;

    fn env() -> Environment {
        Environment::with_host(Rc::new(MemoryHost::new()))
    }

    fn sym(name: &str) -> Value {
        Value::new_symbol(name)
    }

    fn num(n: Int) -> Value {
        Value::Number(n)
    }

    fn error(message: &str) -> Value {
        Value::Error(String::from(message))
    }

    #[test]
    fn self_evaluating_values() {
        let env = env();
        for value in vec![
            num(0),
            num(Int::MAX),
            Value::Str(String::from("s")),
            error("boom"),
            Value::QExpr(vec![sym("undefined")]),
        ] {
            assert_eq!(evaluate(&env, value.clone()), value);
        }
    }

    #[test]
    fn symbols_are_looked_up() {
        let env = env();
        env.put("x", num(5));
        assert_eq!(evaluate(&env, sym("x")), num(5));
        assert_eq!(evaluate(&env, sym("y")), error("undefined symbol: y"));
    }

    #[test]
    fn empty_and_single_sexprs_reduce() {
        let env = env();
        assert_eq!(evaluate(&env, Value::empty_sexpr()), Value::empty_sexpr());
        assert_eq!(evaluate(&env, Value::SExpr(vec![num(3)])), num(3));
        assert_eq!(
            evaluate(&env, Value::SExpr(vec![Value::SExpr(vec![num(3)])])),
            num(3)
        );
    }

    #[test]
    fn applies_builtins() {
        let env = env();
        let expr = Value::SExpr(vec![sym("+"), num(1), num(2), num(3)]);
        assert_eq!(evaluate(&env, expr), num(6));
    }

    #[test]
    fn head_must_be_a_function() {
        let env = env();
        let expr = Value::SExpr(vec![num(1), num(2)]);
        assert_eq!(evaluate(&env, expr), error("not a function"));
    }

    #[test]
    fn first_error_wins() {
        let env = env();
        let expr = Value::SExpr(vec![sym("+"), sym("a"), sym("b")]);
        assert_eq!(evaluate(&env, expr), error("undefined symbol: a"));
    }

    #[test]
    fn evaluation_stops_at_the_first_error() {
        let env = env();
        let def_y = Value::SExpr(vec![
            sym("def"),
            Value::QExpr(vec![sym("y")]),
            num(1),
        ]);
        let expr = Value::SExpr(vec![sym("+"), sym("missing"), def_y]);
        assert_eq!(evaluate(&env, expr), error("undefined symbol: missing"));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn closures_bind_parameters_positionally() {
        let env = env();
        let closure = Closure::new(
            vec![Symbol::from("x"), Symbol::from("y")],
            vec![sym("-"), sym("x"), sym("y")],
            Environment::spawn_from(&env),
        );
        let result = call(&env, Function::Closure(closure), vec![num(10), num(4)]);
        assert_eq!(result, num(6));
    }

    #[test]
    fn closure_arity_is_strict() {
        let env = env();
        let closure = Closure::new(
            vec![Symbol::from("x"), Symbol::from("y")],
            vec![sym("x")],
            Environment::spawn_from(&env),
        );
        assert_eq!(
            call(&env, Function::Closure(closure.clone()), vec![num(1)]),
            error("Function lambda expected 2 args but got 1")
        );
        assert_eq!(
            call(&env, Function::Closure(closure), vec![num(1), num(2), num(3)]),
            error("Function lambda expected 2 args but got 3")
        );
    }

    #[test]
    fn builtin_arity_is_checked_before_the_call() {
        let env = env();
        let head = match env.get("head") {
            Some(Value::Function(f)) => f,
            other => panic!("head bound to {:?}", other),
        };
        assert_eq!(
            call(&env, head, Vec::new()),
            error("Function head expected 1 args but got 0")
        );
    }

    #[test]
    fn typed_errors_render_into_values() {
        let value: Value = Error::DefMismatch {
            symbols: 2,
            values: 1,
        }
        .into();
        assert_eq!(value, error("Function def cannot bind 2 symbols to 1 values"));
        let value: Value = Error::EmptyList("head").into();
        assert_eq!(value, error("Function head expected a non-empty Q-Expression"));
    }
}
