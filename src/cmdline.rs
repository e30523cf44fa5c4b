use crate::environment::Environment;
use crate::printer::render;
use crate::types::Value;
use crate::{evaluator, interpreter};
use ansi_term::Colour;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;

const PROMPT: &str = "qlisp> ";

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Prelude(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Prelude(e) => write!(f, "error reading prelude: {}", e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

pub fn setup() -> io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("qlisp")?;
    interface.set_prompt(PROMPT)?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|mut path| {
        path.push(".qlisp_history");
        path
    })
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

fn display(result: &Value, colour: bool) -> String {
    let text = render(result);
    match result {
        Value::Error(_) if colour => Colour::Red.paint(text).to_string(),
        _ => text,
    }
}

pub fn repl<T: Terminal>(interface: &Interface<T>, env: &Environment) {
    let colour = atty::is(atty::Stream::Stdout);
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                interface.add_history_unique(line.clone());
                let result = interpreter::eval_str(env, &line);
                writeln!(interface, "{}", display(&result, colour)).ok();
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}

/// Reads all of stdin and prints the result of each top-level form, for when input
/// is piped in.
fn run_piped(env: &Environment) -> io::Result<()> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;
    match interpreter::eval_forms(env, &source) {
        Ok(results) => {
            for result in results {
                println!("{}", display(&result, false));
            }
        }
        Err(e) => println!("{}", display(&Value::from(e), false)),
    }
    Ok(())
}

/// With file arguments, loads each file in turn; otherwise reads from stdin.
pub fn launch(args: Vec<String>, env: &Environment) -> Result<(), Error> {
    let files = args.iter().skip(1).collect::<Vec<_>>();
    if !files.is_empty() {
        let colour = atty::is(atty::Stream::Stderr);
        for path in files {
            let result = interpreter::load_file(env, path);
            if result.is_error() {
                eprintln!("{}", display(&result, colour));
            }
        }
        return Ok(());
    }
    if !atty::is(atty::Stream::Stdin) {
        return run_piped(env).map_err(Error::Io);
    }
    let interface = setup()?;
    repl(&interface, env);
    save_history(&interface)?;
    Ok(())
}
