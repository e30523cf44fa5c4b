use crate::environment::Environment;
use crate::evaluator::{self, evaluate, Error};
use crate::printer::render;
use crate::{grammar, reader, Value};

const PRELUDE: &str = include_str!("prelude.lsp");

/// Parses `source` and evaluates it as one expression. A parse failure becomes an
/// `Error` value.
pub fn eval_str(env: &Environment, source: &str) -> Value {
    match grammar::parse(source) {
        Ok(tree) => evaluate(env, reader::read(&tree)),
        Err(e) => Error::Parse(e).into(),
    }
}

pub fn rep(env: &Environment, line: &str) -> String {
    render(&eval_str(env, line))
}

/// Evaluates each top-level form of `source` in turn. Errors produced by a form are
/// written out and do not stop the forms after it.
pub fn load_source(env: &Environment, source: &str) -> evaluator::Result {
    let tree = grammar::parse(source)?;
    for form in reader::read_forms(&tree) {
        let result = evaluate(env, form);
        if result.is_error() {
            log::warn!("{}", result);
            env.host().write_line(&render(&result));
        }
    }
    Ok(Value::empty_sexpr())
}

/// Evaluates every top-level form of `source`, keeping each result. A form may span
/// several lines.
pub fn eval_forms(env: &Environment, source: &str) -> std::result::Result<Vec<Value>, Error> {
    let tree = grammar::parse(source)?;
    Ok(reader::read_forms(&tree)
        .into_iter()
        .map(|form| evaluate(env, form))
        .collect())
}

pub(crate) fn try_load_file(env: &Environment, path: &str) -> evaluator::Result {
    log::info!("loading {}", path);
    let source = env
        .host()
        .read_text_file(path)
        .map_err(|source| Error::Io {
            path: String::from(path),
            source,
        })?;
    load_source(env, &source)
}

pub fn load_file(env: &Environment, path: &str) -> Value {
    try_load_file(env, path).unwrap_or_else(Value::from)
}

pub fn read_prelude(env: &Environment) -> evaluator::Result {
    log::info!("reading prelude");
    load_source(env, PRELUDE)
}
