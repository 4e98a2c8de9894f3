use anyhow::Result;
use std::fmt;
use std::path::Path;

/// Name of the conventional entry function.
pub const ENTRYPOINT_NAME: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
    Variable,
}

/// A public top-level name defined by a loaded script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Function,
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Variable,
        }
    }

    /// Names starting with an underscore are private by convention.
    pub fn is_public_name(name: &str) -> bool {
        !name.starts_with('_')
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SymbolKind::Function => write!(f, "{}() [function]", self.name),
            SymbolKind::Variable => write!(f, "{} [variable]", self.name),
        }
    }
}

/// A loaded script that exposes a zero-argument `main` function.
pub trait Entrypoint {
    fn call_main(&self) -> Result<()>;
}

/// Result of loading a script: its top-level code has already run.
pub enum LoadedUnit {
    Entrypoint(Box<dyn Entrypoint>),
    /// Plain script; public symbols sorted by name.
    Script(Vec<Symbol>),
}

impl fmt::Debug for LoadedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadedUnit::Entrypoint(_) => f.write_str("Entrypoint"),
            LoadedUnit::Script(symbols) => f.debug_tuple("Script").field(symbols).finish(),
        }
    }
}

/// Loads a script file into a fresh namespace and executes its top-level code.
pub trait ScriptLoader {
    fn load(&self, path: &Path) -> Result<LoadedUnit>;
}
