use crate::builtins;
use crate::evaluator::{self, Error};
use crate::host::{Host, StdHost};
use crate::types::{Function, Symbol, Value};
use itertools::Itertools;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

struct Scope {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Environment>,
    host: Rc<dyn Host>,
}

/// A handle to one scope in a chain of scopes. Cloning the handle shares the
/// scope; use [`Environment::duplicate`] to copy its bindings.
#[derive(Clone)]
pub struct Environment(Rc<Scope>);

impl Environment {
    /// A root scope with every builtin bound.
    pub fn with_host(host: Rc<dyn Host>) -> Self {
        let env = Self::empty(host);
        for (&name, &builtin) in builtins::CORE.iter() {
            env.put(name, Value::Function(Function::Builtin(builtin)));
        }
        env
    }

    /// A root scope with no bindings at all.
    pub fn empty(host: Rc<dyn Host>) -> Self {
        Self(Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
            host,
        }))
    }

    pub fn spawn_from(parent: &Environment) -> Self {
        Self(Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent.clone()),
            host: parent.0.host.clone(),
        }))
    }

    /// A new scope holding copies of this scope's bindings, chained to the same parent.
    pub fn duplicate(&self) -> Self {
        Self(Rc::new(Scope {
            bindings: RefCell::new(self.0.bindings.borrow().clone()),
            parent: self.0.parent.clone(),
            host: self.0.host.clone(),
        }))
    }

    pub fn put<T>(&self, key: T, value: Value) -> Option<Value>
    where
        T: Into<Symbol>,
    {
        let Symbol(name) = key.into();
        self.0.bindings.borrow_mut().insert(name, value)
    }

    /// Looks `key` up through the parent chain, returning a copy of the bound value.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut env = self;
        loop {
            if let Some(value) = env.0.bindings.borrow().get(key) {
                return Some(value.clone());
            }
            match &env.0.parent {
                Some(parent) => env = parent,
                None => return None,
            }
        }
    }

    pub fn fetch(&self, key: &Symbol) -> evaluator::Result {
        self.get(key)
            .ok_or_else(|| Error::UndefinedSymbol(key.clone()))
    }

    /// The outermost scope of the chain.
    pub fn root(&self) -> Environment {
        let mut env = self;
        while let Some(parent) = &env.0.parent {
            env = parent;
        }
        env.clone()
    }

    pub fn host(&self) -> &dyn Host {
        self.0.host.as_ref()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::with_host(Rc::new(StdHost))
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.0.bindings.borrow();
        write!(f, "Environment{{{}", bindings.keys().sorted().join(", "))?;
        if let Some(parent) = &self.0.parent {
            write!(f, " -> {:?}", parent)?;
        }
        write!(f, "}}")
    }
}
