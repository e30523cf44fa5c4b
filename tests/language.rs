use pretty_assertions::assert_eq;
use qlisp::host::MemoryHost;
use qlisp::interpreter::{eval_str, load_file, read_prelude, rep};
use qlisp::types::{Function, Int};
use qlisp::{evaluate, Environment, Value};
use std::rc::Rc;

fn setup() -> (Rc<MemoryHost>, Environment) {
    let host = Rc::new(MemoryHost::new());
    let env = Environment::with_host(host.clone());
    (host, env)
}

fn run_all(env: &Environment, lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| rep(env, line)).collect()
}

#[test]
fn numbers_evaluate_to_themselves() {
    let (_, env) = setup();
    for &n in &[0, 1, -1, 42, Int::MAX, Int::MIN] {
        assert_eq!(evaluate(&env, Value::Number(n)), Value::Number(n));
    }
}

#[test]
fn arithmetic_folds_left() {
    let (_, env) = setup();
    assert_eq!(rep(&env, "(+ 1 2 3)"), "6");
    assert_eq!(rep(&env, "(- 1 2 3)"), "-4");
    assert_eq!(rep(&env, "(/ 100 10 5)"), "2");
    assert_eq!(rep(&env, "(- 9)"), "-9");
    for a in &["0", "1", "-7", "123456"] {
        assert_eq!(
            rep(&env, &format!("(/ {} 0)", a)),
            "Error: division by zero"
        );
    }
}

#[test]
fn tail_returns_the_last_element() {
    let (_, env) = setup();
    assert_eq!(rep(&env, "(head [1 2 3])"), "1");
    assert_eq!(rep(&env, "(tail [1 2 3])"), "3");
}

#[test]
fn def_binds_in_the_global_scope() {
    let (_, env) = setup();
    assert_eq!(
        run_all(&env, &["(def [x] 5)", "x", "(+ x 1)"]),
        vec!["()", "5", "6"]
    );
    assert_eq!(
        run_all(&env, &["(def [a b c] 1 2 3)", "(+ a b c)"]),
        vec!["()", "6"]
    );
}

#[test]
fn parameters_are_not_visible_to_sibling_calls() {
    let (_, env) = setup();
    let results = run_all(
        &env,
        &[
            "(def [set-p] (\\ [p] [p]))",
            "(def [get-p] (\\ [q] [p]))",
            "(set-p 1)",
            "(get-p 2)",
            "p",
        ],
    );
    assert_eq!(
        results,
        vec![
            "()",
            "()",
            "1",
            "Error: undefined symbol: p",
            "Error: undefined symbol: p"
        ]
    );
}

#[test]
fn def_is_visible_in_scopes_created_before_it() {
    let (_, env) = setup();
    let results = run_all(
        &env,
        &[
            "(def [show] (\\ [u] [x]))",
            "(show 0)",
            "(def [x] 5)",
            "x",
            "(show 0)",
            "u",
        ],
    );
    assert_eq!(
        results,
        vec![
            "()",
            "Error: undefined symbol: x",
            "()",
            "5",
            "5",
            "Error: undefined symbol: u"
        ]
    );
}

#[test]
fn def_inside_a_function_reaches_the_global_scope() {
    let (_, env) = setup();
    let results = run_all(
        &env,
        &["(def [remember] (\\ [v] [def [kept] v]))", "(remember 9)", "kept"],
    );
    assert_eq!(results, vec!["()", "()", "9"]);
}

#[test]
fn lambdas_apply_with_strict_arity() {
    let (_, env) = setup();
    assert_eq!(rep(&env, "((\\ [x y] [+ x y]) 3 4)"), "7");
    assert_eq!(
        rep(&env, "((\\ [x y] [+ x y]) 3)"),
        "Error: Function lambda expected 2 args but got 1"
    );
}

#[test]
fn closures_capture_their_defining_scope() {
    let (_, env) = setup();
    let results = run_all(
        &env,
        &[
            "(def [adder] (\\ [n] [\\ [m] [+ n m]]))",
            "(def [add5] (adder 5))",
            "(add5 10)",
            "(def [add1] (adder 1))",
            "(add5 1)",
            "(add1 1)",
        ],
    );
    assert_eq!(results, vec!["()", "()", "15", "()", "6", "2"]);
}

#[test]
fn recursion_through_def() {
    let (_, env) = setup();
    let results = run_all(
        &env,
        &[
            "(def [fact] (\\ [n] [if (<= n 1) [1] [* n (fact (- n 1))]]))",
            "(fact 10)",
        ],
    );
    assert_eq!(results, vec!["()", "3628800"]);
}

#[test]
fn equality() {
    let (_, env) = setup();
    assert_eq!(rep(&env, "(== [1 2] [1 2])"), "1");
    assert_eq!(rep(&env, "(== [1 2] [2 1])"), "0");
    assert_eq!(rep(&env, "(== (\\ [x] [x]) (\\ [x] [x]))"), "1");
}

#[test]
fn conditionals() {
    let (_, env) = setup();
    assert_eq!(rep(&env, "(if 0 [1] [2])"), "2");
    assert_eq!(rep(&env, "(if 1 [1])"), "1");
    assert_eq!(rep(&env, "(if (/ 1 0) [1] [2])"), "Error: division by zero");
    assert_eq!(
        rep(&env, "(if (> 2 1) [print \"yes\"] [undefined])"),
        "()"
    );
}

#[test]
fn branches_not_taken_are_never_evaluated() {
    let (host, env) = setup();
    assert_eq!(rep(&env, "(if 1 [print \"then\"] [print \"else\"])"), "()");
    assert_eq!(host.output(), vec!["\"then\""]);
}

#[test]
fn lists_round_trip_through_eval() {
    let (_, env) = setup();
    assert_eq!(rep(&env, "(eval (array + 1 2))"), "3");
    assert_eq!(rep(&env, "(eval (concat [+] [1 2] [3]))"), "6");
}

#[test]
fn one_undefined_symbol_error_reaches_the_top() {
    let (_, env) = setup();
    assert_eq!(
        eval_str(&env, "(+ 1 (* first 2) (- second 3))"),
        Value::Error(String::from("undefined symbol: first"))
    );
    assert_eq!(
        rep(&env, "(head (array (tail [nope1]) nope2 nope3))"),
        "Error: undefined symbol: nope2"
    );
}

#[test]
fn errors_are_ordinary_values() {
    let (_, env) = setup();
    assert_eq!(rep(&env, "(error \"custom\")"), "Error: custom");
    assert_eq!(rep(&env, "(+ 1 (error \"inner\"))"), "Error: inner");
    assert_eq!(rep(&env, "[(error \"quoted\")]"), "[(error \"quoted\")]");
    assert_eq!(rep(&env, "(1 2)"), "Error: not a function");
}

#[test]
fn strings_print_escaped() {
    let (host, env) = setup();
    assert_eq!(rep(&env, r#""a\tb""#), r#""a\tb""#);
    assert_eq!(rep(&env, r#"(print "line\n" 1)"#), "()");
    assert_eq!(host.output(), vec![r#""line\n" 1"#]);
}

#[test]
fn functions_print_their_shape() {
    let (_, env) = setup();
    assert_eq!(rep(&env, "+"), "<builtin>");
    assert_eq!(rep(&env, "(\\ [a] [* a a])"), "(\\ [a] [* a a])");
}

#[test]
fn looked_up_values_are_independent_copies() {
    let (_, env) = setup();
    rep(&env, "(def [square] (\\ [a] [* a a]))");
    let first = env.get("square");
    assert_eq!(rep(&env, "(square 3)"), "9");
    assert_eq!(env.get("square"), first);
    match env.get("square") {
        Some(Value::Function(Function::Closure(closure))) => {
            assert_eq!(closure.scope.get("a"), None)
        }
        other => panic!("square bound to {:?}", other),
    }
}

#[test]
fn programs_load_from_files() {
    let (host, env) = setup();
    read_prelude(&env).unwrap();
    host.add_file(
        "prog.lsp",
        r#"
        ; square numbers
        (def [square] (\ [x] [* x x]))
        (print (square 4))
        (print undefined-thing)
        (def [done] true)
        "#,
    );
    assert_eq!(load_file(&env, "prog.lsp"), Value::empty_sexpr());
    assert_eq!(
        host.output(),
        vec!["16", "Error: undefined symbol: undefined-thing"]
    );
    assert_eq!(rep(&env, "done"), "1");
}
