use crate::environment::Environment;
use crate::evaluator::{self, evaluate, Error};
use crate::types::{Arity, BadArgCount, Builtin, Closure, Function, Int, TypeMismatch, Value};
use crate::{interpreter, printer};
use itertools::Itertools;
use std::collections::HashMap;

fn grab_ints(name: &'static str, args: &[Value]) -> evaluator::Result<Vec<Int>> {
    args.iter()
        .enumerate()
        .map(|(i, arg)| arg.as_number(name, i + 1).map_err(Error::from))
        .collect()
}

fn fold_ints(
    name: &'static str,
    args: &[Value],
    op: fn(Int, Int) -> evaluator::Result<Int>,
) -> evaluator::Result {
    let operands = grab_ints(name, args)?;
    match operands.split_first() {
        Some((&first, rest)) => rest
            .iter()
            .try_fold(first, |acc, &x| op(acc, x))
            .map(Value::Number),
        None => Err(Error::BadArgCount(BadArgCount {
            name,
            expected: Arity::at_least(1),
            got: 0,
        })),
    }
}

static ADD: Builtin = Builtin {
    name: "+",
    arity: Arity::at_least(1),
    fn_ptr: add_,
};

fn add_(_: &Environment, args: Vec<Value>) -> evaluator::Result {
    fold_ints("+", &args, |x, y| Ok(x.wrapping_add(y)))
}

static SUB: Builtin = Builtin {
    name: "-",
    arity: Arity::at_least(1),
    fn_ptr: sub_,
};

fn sub_(_: &Environment, args: Vec<Value>) -> evaluator::Result {
    if let [operand] = args.as_slice() {
        return Ok(Value::Number(operand.as_number("-", 1)?.wrapping_neg()));
    }
    fold_ints("-", &args, |x, y| Ok(x.wrapping_sub(y)))
}

static MUL: Builtin = Builtin {
    name: "*",
    arity: Arity::at_least(1),
    fn_ptr: mul_,
};

fn mul_(_: &Environment, args: Vec<Value>) -> evaluator::Result {
    fold_ints("*", &args, |x, y| Ok(x.wrapping_mul(y)))
}

static DIV: Builtin = Builtin {
    name: "/",
    arity: Arity::at_least(1),
    fn_ptr: div_,
};

fn div_(_: &Environment, args: Vec<Value>) -> evaluator::Result {
    fold_ints("/", &args, |x, y| match y {
        0 => Err(Error::DivideByZero),
        _ => Ok(x.wrapping_div(y)),
    })
}

fn comparison_(
    name: &'static str,
    args: &[Value],
    comp: fn(&Int, &Int) -> bool,
) -> evaluator::Result {
    match grab_ints(name, args)?.as_slice() {
        [x, y] => Ok(Value::from(comp(x, y))),
        _ => unreachable!(),
    }
}

macro_rules! comparison_builtin {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            static $NAME: Builtin = Builtin {
                name: stringify!($SYMBOL),
                arity: Arity::exactly(2),
                fn_ptr: |_: &Environment, args: Vec<Value>| {
                    comparison_(stringify!($SYMBOL), &args, Int:: [<$NAME:lower>])
                },
            };
        }
    };
}

comparison_builtin!(<, LT);
comparison_builtin!(<=, LE);
comparison_builtin!(>, GT);
comparison_builtin!(>=, GE);

static EQUAL: Builtin = Builtin {
    name: "==",
    arity: Arity::exactly(2),
    fn_ptr: equal_,
};

fn equal_(_: &Environment, args: Vec<Value>) -> evaluator::Result {
    Ok(Value::from(args[0] == args[1]))
}

fn condition(name: &'static str, value: &Value) -> evaluator::Result<bool> {
    value.truthy().ok_or_else(|| {
        Error::TypeMismatch(TypeMismatch::new(
            name,
            1,
            "Number, Q-Expression or Function",
            value,
        ))
    })
}

static NOT: Builtin = Builtin {
    name: "!",
    arity: Arity::exactly(1),
    fn_ptr: not_,
};

fn not_(_: &Environment, args: Vec<Value>) -> evaluator::Result {
    Ok(Value::from(!condition("!", &args[0])?))
}

static IF: Builtin = Builtin {
    name: "if",
    arity: Arity::Between(2..=3),
    fn_ptr: if_,
};

fn if_(env: &Environment, mut args: Vec<Value>) -> evaluator::Result {
    let test = args.remove(0);
    if test.is_error() {
        return Ok(test);
    }
    let branches: Vec<Vec<Value>> = args
        .into_iter()
        .enumerate()
        .map(|(i, branch)| branch.into_qexpr("if", i + 2))
        .collect::<Result<_, _>>()?;
    let mut branches = branches.into_iter();
    let chosen = match condition("if", &test)? {
        true => branches.next(),
        false => branches.nth(1),
    };
    Ok(match chosen {
        Some(body) => evaluate(env, Value::SExpr(body)),
        None => Value::empty_sexpr(),
    })
}

static ARRAY: Builtin = Builtin {
    name: "array",
    arity: Arity::at_least(0),
    fn_ptr: array_,
};

fn array_(_: &Environment, args: Vec<Value>) -> evaluator::Result {
    Ok(Value::QExpr(args))
}

static HEAD: Builtin = Builtin {
    name: "head",
    arity: Arity::exactly(1),
    fn_ptr: head_,
};

fn head_(_: &Environment, mut args: Vec<Value>) -> evaluator::Result {
    let list = args.remove(0).into_qexpr("head", 1)?;
    list.into_iter().next().ok_or(Error::EmptyList("head"))
}

// Returns the last element rather than everything after the head.
static TAIL: Builtin = Builtin {
    name: "tail",
    arity: Arity::exactly(1),
    fn_ptr: tail_,
};

fn tail_(_: &Environment, mut args: Vec<Value>) -> evaluator::Result {
    let mut list = args.remove(0).into_qexpr("tail", 1)?;
    list.pop().ok_or(Error::EmptyList("tail"))
}

static EVAL: Builtin = Builtin {
    name: "eval",
    arity: Arity::exactly(1),
    fn_ptr: eval_,
};

fn eval_(env: &Environment, mut args: Vec<Value>) -> evaluator::Result {
    let list = args.remove(0).into_qexpr("eval", 1)?;
    Ok(evaluate(env, Value::SExpr(list)))
}

static CONCAT: Builtin = Builtin {
    name: "concat",
    arity: Arity::at_least(1),
    fn_ptr: concat_,
};

fn concat_(_: &Environment, args: Vec<Value>) -> evaluator::Result {
    let mut output = Vec::new();
    for (i, arg) in args.into_iter().enumerate() {
        output.extend(arg.into_qexpr("concat", i + 1)?);
    }
    Ok(Value::QExpr(output))
}

static DEF: Builtin = Builtin {
    name: "def",
    arity: Arity::at_least(2),
    fn_ptr: def_,
};

fn def_(env: &Environment, mut args: Vec<Value>) -> evaluator::Result {
    let symbols = args
        .remove(0)
        .into_qexpr("def", 1)?
        .into_iter()
        .map(|name| name.into_symbol("def", 1))
        .collect::<Result<Vec<_>, _>>()?;
    if symbols.len() != args.len() {
        return Err(Error::DefMismatch {
            symbols: symbols.len(),
            values: args.len(),
        });
    }
    let global = env.root();
    for (symbol, value) in symbols.into_iter().zip(args) {
        log::debug!("define {} as {}", symbol, value);
        global.put(symbol, value);
    }
    Ok(Value::empty_sexpr())
}

static LAMBDA: Builtin = Builtin {
    name: "\\",
    arity: Arity::exactly(2),
    fn_ptr: lambda_,
};

fn lambda_(env: &Environment, args: Vec<Value>) -> evaluator::Result {
    let mut args = args.into_iter();
    let (params, body) = match (args.next(), args.next()) {
        (Some(params), Some(body)) => (params, body),
        _ => unreachable!(),
    };
    let params = params
        .into_qexpr("\\", 1)?
        .into_iter()
        .map(|param| param.into_symbol("\\", 1))
        .collect::<Result<Vec<_>, _>>()?;
    let body = body.into_qexpr("\\", 2)?;
    let closure = Closure::new(params, body, Environment::spawn_from(env));
    log::debug!("built closure {}", closure);
    Ok(Value::Function(Function::Closure(closure)))
}

static LOAD: Builtin = Builtin {
    name: "load",
    arity: Arity::exactly(1),
    fn_ptr: load_,
};

fn load_(env: &Environment, args: Vec<Value>) -> evaluator::Result {
    let path = args[0].as_str("load", 1)?;
    interpreter::try_load_file(env, path)
}

static PRINT: Builtin = Builtin {
    name: "print",
    arity: Arity::at_least(0),
    fn_ptr: print_,
};

fn print_(env: &Environment, args: Vec<Value>) -> evaluator::Result {
    let text = args.iter().map(printer::render).join(" ");
    env.host().write_line(&text);
    Ok(Value::empty_sexpr())
}

static ERROR: Builtin = Builtin {
    name: "error",
    arity: Arity::exactly(1),
    fn_ptr: error_,
};

fn error_(_: &Environment, args: Vec<Value>) -> evaluator::Result {
    let message = args[0].as_str("error", 1)?;
    Ok(Value::Error(String::from(message)))
}

type Namespace = HashMap<&'static str, &'static Builtin>;
lazy_static! {
    pub static ref CORE: Namespace = {
        let mut map = Namespace::new();
        for &func in [
            // Arithmetic
            &ADD,
            &SUB,
            &MUL,
            &DIV,
            // Comparisons
            &GT,
            &GE,
            &LT,
            &LE,
            &EQUAL,
            &NOT,
            // Working with lists
            &ARRAY,
            &HEAD,
            &TAIL,
            &CONCAT,
            &EVAL,
            // Definitions and control flow
            &DEF,
            &LAMBDA,
            &IF,
            // Other
            &LOAD,
            &PRINT,
            &ERROR,
        ]
        .iter()
        {
            map.insert(func.name, func);
        }
        map
    };
}
