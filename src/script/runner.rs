//! # Script Runner
//!
//! Loads a selected file through a [`ScriptLoader`] and reports what happened
//! on the log stream. Failures never escape: a script that does not parse,
//! throws at the top level, or throws from `main()` is logged with its stack
//! and turned into [`RunOutcome::Failed`], so the menu keeps running.

use crate::script::loader::{LoadedUnit, ScriptLoader, Symbol, ENTRYPOINT_NAME};
use crate::script::quickjs::ScriptError;
use std::fmt;
use std::path::Path;

/// Width of the rule printed under the "Running ..." banner.
const RULE_WIDTH: usize = 80;

/// How a file is described in the run banner, inferred from its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Example,
    Converter,
    File,
}

impl ScriptKind {
    pub fn from_path(path: &Path) -> Self {
        let path = path.to_string_lossy();
        if path.contains("/examples/") {
            ScriptKind::Example
        } else if path.contains("/converters/") {
            ScriptKind::Converter
        } else {
            ScriptKind::File
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScriptKind::Example => "example",
            ScriptKind::Converter => "converter",
            ScriptKind::File => "file",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// `main()` was found and returned normally.
    Entrypoint,
    /// No entry function; the script's public symbols.
    Symbols(Vec<Symbol>),
    /// Loading or running failed; the error message.
    Failed(String),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Failed(_))
    }
}

/// Run a script file and log a report. Never fails.
pub fn run_script_file(loader: &dyn ScriptLoader, path: &Path) -> RunOutcome {
    let kind = ScriptKind::from_path(path);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::info!("\nRunning {}: {}", kind, file_name);
    tracing::info!("{}", "=".repeat(RULE_WIDTH));

    let result = loader.load(path).and_then(|unit| match unit {
        LoadedUnit::Entrypoint(entry) => {
            tracing::info!("Found {}() function, executing...", ENTRYPOINT_NAME);
            entry.call_main().map(|()| RunOutcome::Entrypoint)
        }
        LoadedUnit::Script(symbols) => {
            tracing::info!(
                "No {}() function found, module was imported successfully.",
                ENTRYPOINT_NAME
            );
            if !symbols.is_empty() {
                tracing::info!("\nAvailable public attributes/functions:");
                for symbol in &symbols {
                    tracing::info!("  - {}", symbol);
                }
            }
            Ok(RunOutcome::Symbols(symbols))
        }
    });

    match result {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!("Error running {}: {:#}", kind, err);
            tracing::error!("  in {}", path.display());
            if let Some(stack) = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<ScriptError>())
                .and_then(|script_err| script_err.stack.as_deref())
            {
                tracing::error!("Stack trace:\n{}", stack);
            }
            RunOutcome::Failed(format!("{:#}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::loader::Entrypoint;
    use anyhow::{bail, Context, Result};
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::rc::Rc;

    struct CountingEntrypoint {
        calls: Rc<Cell<usize>>,
        fail: bool,
    }

    impl Entrypoint for CountingEntrypoint {
        fn call_main(&self) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                bail!("main failed");
            }
            Ok(())
        }
    }

    enum FakeBehavior {
        Main { fail: bool },
        Symbols(Vec<Symbol>),
        LoadError,
    }

    struct FakeLoader {
        behavior: FakeBehavior,
        calls: Rc<Cell<usize>>,
    }

    impl FakeLoader {
        fn new(behavior: FakeBehavior) -> Self {
            Self {
                behavior,
                calls: Rc::new(Cell::new(0)),
            }
        }
    }

    impl ScriptLoader for FakeLoader {
        fn load(&self, _path: &Path) -> Result<LoadedUnit> {
            match &self.behavior {
                FakeBehavior::Main { fail } => Ok(LoadedUnit::Entrypoint(Box::new(
                    CountingEntrypoint {
                        calls: Rc::clone(&self.calls),
                        fail: *fail,
                    },
                ))),
                FakeBehavior::Symbols(symbols) => Ok(LoadedUnit::Script(symbols.clone())),
                FakeBehavior::LoadError => bail!("SyntaxError: unexpected token"),
            }
        }
    }

    #[test]
    fn test_script_kind_from_path() {
        assert_eq!(
            ScriptKind::from_path(Path::new("/proj/src/examples/a.js")),
            ScriptKind::Example
        );
        assert_eq!(
            ScriptKind::from_path(Path::new("/proj/src/pdf/converters/b.js")),
            ScriptKind::Converter
        );
        assert_eq!(
            ScriptKind::from_path(Path::new("/proj/src/tools/c.js")),
            ScriptKind::File
        );
        assert_eq!(ScriptKind::Converter.to_string(), "converter");
    }

    #[test]
    fn test_entrypoint_called_exactly_once() {
        let loader = FakeLoader::new(FakeBehavior::Main { fail: false });
        let outcome = run_script_file(&loader, &PathBuf::from("/proj/src/examples/a.js"));

        assert_eq!(outcome, RunOutcome::Entrypoint);
        assert_eq!(loader.calls.get(), 1);
    }

    #[test]
    fn test_failing_entrypoint_is_contained() {
        let loader = FakeLoader::new(FakeBehavior::Main { fail: true });
        let outcome = run_script_file(&loader, &PathBuf::from("/proj/src/examples/a.js"));

        assert_eq!(outcome, RunOutcome::Failed("main failed".to_string()));
        assert!(!outcome.is_success());
        assert_eq!(loader.calls.get(), 1);
    }

    #[test]
    fn test_symbols_reported_without_entrypoint() {
        let symbols = vec![Symbol::function("convert"), Symbol::variable("RATE")];
        let loader = FakeLoader::new(FakeBehavior::Symbols(symbols.clone()));
        let outcome = run_script_file(&loader, &PathBuf::from("/proj/src/tools/c.js"));

        assert_eq!(outcome, RunOutcome::Symbols(symbols));
        assert_eq!(loader.calls.get(), 0);
    }

    #[test]
    fn test_failure_report_names_file_once() {
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = crate::logging::build_subscriber(
            move || writer.clone(),
            tracing_subscriber::EnvFilter::new("info"),
        );

        let loader = FakeLoader::new(FakeBehavior::LoadError);
        tracing::subscriber::with_default(subscriber, || {
            run_script_file(&loader, &PathBuf::from("/proj/src/tools/c.js"));
        });

        let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(log.contains("Error running file: SyntaxError: unexpected token\n"));
        assert!(log.contains("  in /proj/src/tools/c.js\n"));
        assert_eq!(log.matches("unexpected token").count(), 1);
    }

    #[test]
    fn test_error_context_chain_is_kept() {
        struct MissingLoader;

        impl ScriptLoader for MissingLoader {
            fn load(&self, path: &Path) -> Result<LoadedUnit> {
                Err(anyhow::anyhow!("No such file or directory"))
                    .with_context(|| format!("Failed to read script: {}", path.display()))
            }
        }

        let outcome = run_script_file(&MissingLoader, &PathBuf::from("/proj/src/tools/c.js"));
        assert_eq!(
            outcome,
            RunOutcome::Failed(
                "Failed to read script: /proj/src/tools/c.js: No such file or directory"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_load_error_is_contained() {
        let loader = FakeLoader::new(FakeBehavior::LoadError);
        let outcome = run_script_file(&loader, &PathBuf::from("/proj/src/tools/c.js"));

        assert_eq!(
            outcome,
            RunOutcome::Failed("SyntaxError: unexpected token".to_string())
        );
    }
}
