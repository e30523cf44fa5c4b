//! The outside world as seen by the interpreter: reading source files for `load`
//! and writing lines for `print`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::read_to_string;
use std::io;

pub trait Host {
    fn read_text_file(&self, path: &str) -> io::Result<String>;
    fn write_line(&self, line: &str);
}

/// Reads from the filesystem and prints to stdout.
#[derive(Debug, Default)]
pub struct StdHost;

impl Host for StdHost {
    fn read_text_file(&self, path: &str) -> io::Result<String> {
        read_to_string(path)
    }

    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Serves files from memory and records everything written.
#[derive(Debug, Default)]
pub struct MemoryHost {
    files: RefCell<HashMap<String, String>>,
    output: RefCell<Vec<String>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: &str, contents: &str) {
        self.files
            .borrow_mut()
            .insert(String::from(path), String::from(contents));
    }

    pub fn output(&self) -> Vec<String> {
        self.output.borrow().clone()
    }
}

impl Host for MemoryHost {
    fn read_text_file(&self, path: &str) -> io::Result<String> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path))
        })
    }

    fn write_line(&self, line: &str) {
        self.output.borrow_mut().push(String::from(line));
    }
}
