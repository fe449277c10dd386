use crate::language::ast::DEFAULT_MODULE;
use crate::runtime::{
    error::{RuntimeError, RuntimeResult},
    platform::Platform,
    stdlib,
    value::Value,
};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub type NativeResult = Result<Value, String>;

/// How many arguments a native function accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Variadic { min: usize },
}

impl Arity {
    pub fn check(&self, module: &str, name: &str, received: usize) -> RuntimeResult<()> {
        match *self {
            Arity::Fixed(expected) if expected != received => Err(RuntimeError::ArityMismatch {
                module: module.to_string(),
                name: name.to_string(),
                expected,
                received,
            }),
            Arity::Variadic { min } if received < min => Err(RuntimeError::TooFewArguments {
                module: module.to_string(),
                name: name.to_string(),
                minimum: min,
                received,
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Clone)]
pub struct NativeFunction {
    pub arity: Arity,
    callable: Rc<dyn Fn(&[Value]) -> NativeResult>,
}

impl NativeFunction {
    pub fn new(arity: Arity, callable: impl Fn(&[Value]) -> NativeResult + 'static) -> Self {
        Self {
            arity,
            callable: Rc::new(callable),
        }
    }

    pub fn call(&self, args: &[Value]) -> NativeResult {
        (self.callable)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// The functions one module exposes, keyed by name.
pub type ModuleTable = HashMap<String, NativeFunction>;

/// Namespace of namespaces: module name to function table.
#[derive(Debug)]
pub struct Registry {
    modules: HashMap<String, ModuleTable>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        let mut modules = HashMap::new();
        modules.insert(DEFAULT_MODULE.to_string(), ModuleTable::new());
        Self { modules }
    }

    pub fn register(&mut self, module: &str, name: &str, function: NativeFunction) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(name.to_string(), function);
    }

    pub fn has_module(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Asks `loader` to populate `module`. Functions already registered under
    /// that name are kept unless the loader replaces them.
    pub fn include(&mut self, module: &str, loader: &dyn ModuleLoader) -> RuntimeResult<()> {
        let mut table = self.modules.remove(module).unwrap_or_default();
        let found = loader.load(module, &mut table);
        if found || !table.is_empty() || module == DEFAULT_MODULE {
            self.modules.insert(module.to_string(), table);
        }
        if found {
            Ok(())
        } else {
            Err(RuntimeError::ModuleNotFound {
                module: module.to_string(),
            })
        }
    }

    pub fn resolve(&self, module: &str, name: &str) -> RuntimeResult<&NativeFunction> {
        let table = self
            .modules
            .get(module)
            .ok_or_else(|| RuntimeError::UnknownModule {
                module: module.to_string(),
            })?;
        table
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownFunction {
                module: module.to_string(),
                name: name.to_string(),
            })
    }
}

/// Source of includable modules. `load` fills `table` and returns `false`
/// when it has no module called `name`.
pub trait ModuleLoader {
    fn load(&self, name: &str, table: &mut ModuleTable) -> bool;
}

type SetupFn = Box<dyn Fn(&mut ModuleTable)>;

/// In-process module catalog. Ships the `std` module.
pub struct Catalog {
    modules: HashMap<String, SetupFn>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    pub fn with_platform(platform: Rc<dyn Platform>) -> Self {
        let mut catalog = Self::empty();
        catalog.add(stdlib::MODULE_NAME, move |table| {
            stdlib::setup(platform.clone(), table)
        });
        catalog
    }

    pub fn add(&mut self, name: &str, setup: impl Fn(&mut ModuleTable) + 'static) {
        self.modules.insert(name.to_string(), Box::new(setup));
    }
}

impl ModuleLoader for Catalog {
    fn load(&self, name: &str, table: &mut ModuleTable) -> bool {
        match self.modules.get(name) {
            Some(setup) => {
                setup(table);
                true
            }
            None => false,
        }
    }
}
