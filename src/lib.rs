pub mod builtins;
pub mod cmdline;
pub mod environment;
pub mod evaluator;
pub mod grammar;
pub mod host;
pub mod interpreter;
pub mod printer;
pub mod reader;
pub mod types;

#[macro_use]
extern crate lazy_static;

mod strings;

pub use environment::Environment;
pub use evaluator::evaluate;
pub use types::Value;
