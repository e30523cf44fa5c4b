use qlisp::{cmdline, environment::Environment, interpreter};

fn main() -> Result<(), cmdline::Error> {
    pretty_env_logger::init();
    let env = Environment::default();
    interpreter::read_prelude(&env).map_err(cmdline::Error::Prelude)?;
    let args = std::env::args().collect();
    cmdline::launch(args, &env)
}
