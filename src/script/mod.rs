//! # Script Module
//!
//! Finding scripts on disk and running them in-process.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`discovery`] | Build the category tree from `<project>/src` |
//! | [`declarations`] | Names bound by a script's top-level statements |
//! | [`loader`] | The loader contract: entrypoint or plain script |
//! | [`quickjs`] | QuickJS-backed loader for `.js` files |
//! | [`runner`] | Run a file and report the outcome, containing failures |

pub mod declarations;
pub mod discovery;
pub mod loader;
pub mod quickjs;
pub mod runner;

pub use discovery::{
    build_tree, discover_categories, subtree, DiscoveryOptions, ScriptTree, TreeNode,
};
pub use loader::{Entrypoint, LoadedUnit, ScriptLoader, Symbol, SymbolKind};
pub use quickjs::QuickJsLoader;
pub use runner::{run_script_file, RunOutcome, ScriptKind};
