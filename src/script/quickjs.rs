//! # QuickJS Script Loader
//!
//! Runs JavaScript files in-process using an embedded QuickJS runtime.
//!
//! Every load gets a brand new [`Context`], so scripts never see each other's
//! globals. The context is populated with a small host API before the script
//! runs:
//!
//! | Global | Behavior |
//! |--------|----------|
//! | `console.log` / `console.info` | info line on the log stream |
//! | `console.warn` | warning line |
//! | `console.error` | error line |
//! | `print` | same as `console.log` |
//!
//! After the top-level code has run, a `main` function declaring no
//! parameters (whether `function main`, `const main = ...` or a global
//! property) turns the script into an [`Entrypoint`]. Anything else is
//! reported through the names the script declared at the top level or added
//! to `globalThis`.
//!
//! Promise rejections nobody handles, from top-level code or from an async
//! `main`, fail the run just like a synchronous throw.

use crate::script::declarations::top_level_names;
use crate::script::loader::{Entrypoint, LoadedUnit, ScriptLoader, Symbol, ENTRYPOINT_NAME};
use anyhow::{anyhow, Context as _, Result};
use rquickjs::context::EvalOptions;
use rquickjs::function::Rest;
use rquickjs::{Context, Ctx, Function, Object, Runtime, Type, Value};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Log target used for output produced by scripts themselves.
pub const SCRIPT_LOG_TARGET: &str = "script";

/// A JavaScript exception raised while loading or running a script.
#[derive(Debug, Clone)]
pub struct ScriptError {
    /// `Name: message`, e.g. `TypeError: x is not a function`.
    pub message: String,
    pub stack: Option<String>,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ScriptError {}

/// Rejections reported by the runtime that no handler has claimed yet.
#[derive(Clone, Default)]
struct Rejections(Arc<Mutex<Vec<ScriptError>>>);

impl Rejections {
    fn pending(&self) -> MutexGuard<'_, Vec<ScriptError>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn track(&self, error: ScriptError, is_handled: bool) {
        let mut pending = self.pending();
        if is_handled {
            // A handler attached after the rejection claims the latest match
            if let Some(pos) = pending.iter().rposition(|e| e.message == error.message) {
                pending.remove(pos);
            }
        } else {
            tracing::debug!("Unhandled promise rejection: {}", error);
            pending.push(error);
        }
    }

    fn clear(&self) {
        self.pending().clear();
    }

    /// Fail with the first unhandled rejection, if any.
    fn check(&self) -> Result<()> {
        let mut pending = self.pending();
        if pending.is_empty() {
            return Ok(());
        }
        let first = pending.remove(0);
        pending.clear();
        Err(first.into())
    }
}

pub struct QuickJsLoader {
    runtime: Runtime,
    rejections: Rejections,
}

impl QuickJsLoader {
    pub fn new() -> Result<Self> {
        let runtime =
            Runtime::new().map_err(|e| anyhow!("Failed to create QuickJS runtime: {}", e))?;

        let rejections = Rejections::default();
        let tracked = rejections.clone();
        runtime.set_host_promise_rejection_tracker(Some(Box::new(
            move |_ctx, _promise, reason, is_handled| {
                tracked.track(exception_to_error(&reason), is_handled);
            },
        )));

        Ok(Self {
            runtime,
            rejections,
        })
    }
}

impl ScriptLoader for QuickJsLoader {
    fn load(&self, path: &Path) -> Result<LoadedUnit> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        let source_name = path.display().to_string();
        let declared = top_level_names(&source);

        let context = Context::full(&self.runtime)
            .map_err(|e| anyhow!("Failed to create QuickJS context: {}", e))?;

        self.rejections.clear();

        context.with(|ctx| {
            install_host_api(&ctx)
                .map_err(|e| anyhow!("Failed to set up script globals: {}", e))?;

            let baseline: HashSet<String> = global_names(&ctx, &source_name)?
                .into_iter()
                .collect();

            let mut eval_options = EvalOptions::default();
            eval_options.global = true;
            eval_options.strict = false;
            ctx.eval_with_options::<(), _>(source.as_bytes(), eval_options)
                .map_err(|e| script_error(&ctx, e))?;
            run_pending_jobs(&ctx)?;
            self.rejections.check()?;

            // Evaluated in global scope so lexical bindings are visible too
            let check = format!(
                "typeof {0} === 'function' && {0}.length === 0",
                ENTRYPOINT_NAME
            );
            let has_entrypoint: bool = ctx.eval(check).map_err(|e| script_error(&ctx, e))?;

            if has_entrypoint {
                tracing::debug!("{} exposes {}()", source_name, ENTRYPOINT_NAME);
                return Ok(LoadedUnit::Entrypoint(Box::new(JsEntrypoint {
                    context: context.clone(),
                    rejections: self.rejections.clone(),
                })));
            }

            let names: BTreeSet<String> = global_names(&ctx, &source_name)?
                .into_iter()
                .filter(|name| !baseline.contains(name))
                .chain(declared)
                .filter(|name| Symbol::is_public_name(name))
                .collect();

            let symbols = names
                .into_iter()
                .map(|name| {
                    if is_function(&ctx, &name) {
                        Symbol::function(name)
                    } else {
                        Symbol::variable(name)
                    }
                })
                .collect();

            Ok(LoadedUnit::Script(symbols))
        })
    }
}

/// Keeps the script's context alive so `main` can be called after loading.
struct JsEntrypoint {
    context: Context,
    rejections: Rejections,
}

impl Entrypoint for JsEntrypoint {
    fn call_main(&self) -> Result<()> {
        self.rejections.clear();

        self.context.with(|ctx| {
            let main: Function = ctx
                .eval(ENTRYPOINT_NAME)
                .map_err(|e| script_error(&ctx, e))?;
            let returned: Value = main.call(()).map_err(|e| script_error(&ctx, e))?;

            if let Some(promise) = returned.as_promise() {
                if let Err(e) = promise.finish::<Value>() {
                    // The tracker saw the same rejection; report it once
                    self.rejections.clear();
                    return Err(script_error(&ctx, e));
                }
            }

            run_pending_jobs(&ctx)?;
            self.rejections.check()
        })
    }
}

fn install_host_api<'js>(ctx: &Ctx<'js>) -> rquickjs::Result<()> {
    let globals = ctx.globals();

    let console = Object::new(ctx.clone())?;
    console.set(
        "log",
        Function::new(ctx.clone(), |args: Rest<Value<'js>>| {
            tracing::info!(target: SCRIPT_LOG_TARGET, "{}", join_args(&args));
        })?,
    )?;
    console.set(
        "info",
        Function::new(ctx.clone(), |args: Rest<Value<'js>>| {
            tracing::info!(target: SCRIPT_LOG_TARGET, "{}", join_args(&args));
        })?,
    )?;
    console.set(
        "warn",
        Function::new(ctx.clone(), |args: Rest<Value<'js>>| {
            tracing::warn!(target: SCRIPT_LOG_TARGET, "{}", join_args(&args));
        })?,
    )?;
    console.set(
        "error",
        Function::new(ctx.clone(), |args: Rest<Value<'js>>| {
            tracing::error!(target: SCRIPT_LOG_TARGET, "{}", join_args(&args));
        })?,
    )?;
    globals.set("console", console)?;

    globals.set(
        "print",
        Function::new(ctx.clone(), |args: Rest<Value<'js>>| {
            tracing::info!(target: SCRIPT_LOG_TARGET, "{}", join_args(&args));
        })?,
    )?;

    Ok(())
}

fn join_args<'js>(args: &Rest<Value<'js>>) -> String {
    args.0
        .iter()
        .map(js_value_to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a value the way a console would.
fn js_value_to_string<'js>(val: &Value<'js>) -> String {
    match val.type_of() {
        Type::Undefined | Type::Uninitialized => "undefined".to_string(),
        Type::Null => "null".to_string(),
        Type::Bool => val.as_bool().map(|b| b.to_string()).unwrap_or_default(),
        Type::Int => val.as_int().map(|n| n.to_string()).unwrap_or_default(),
        Type::Float => val.as_float().map(|f| f.to_string()).unwrap_or_default(),
        Type::String => val
            .as_string()
            .and_then(|s| s.to_string().ok())
            .unwrap_or_default(),
        Type::Function | Type::Constructor => "[function]".to_string(),
        Type::Symbol => "[symbol]".to_string(),
        Type::Exception => val
            .as_exception()
            .map(|exc| {
                format!(
                    "{}\n{}",
                    exc.message().unwrap_or_default(),
                    exc.stack().unwrap_or_default()
                )
            })
            .unwrap_or_else(|| "[exception]".to_string()),
        _ => val
            .ctx()
            .json_stringify(val.clone())
            .ok()
            .flatten()
            .and_then(|s| s.to_string().ok())
            .unwrap_or_else(|| format!("[{}]", val.type_name())),
    }
}

fn global_names(ctx: &Ctx<'_>, source_name: &str) -> Result<Vec<String>> {
    ctx.eval::<Vec<String>, _>("Object.getOwnPropertyNames(globalThis)")
        .map_err(|e| anyhow!("Failed to list globals of {}: {}", source_name, e))
}

/// Whether `name` resolves to a function in global scope.
fn is_function(ctx: &Ctx<'_>, name: &str) -> bool {
    let lexical = ctx.eval::<bool, _>(format!("typeof {} === 'function'", name));
    match lexical {
        Ok(is_function) => is_function,
        Err(_) => {
            // Not an identifier, e.g. a property set through globalThis["a-b"]
            let _ = ctx.catch();
            ctx.globals()
                .get::<_, Value>(name)
                .map(|v| v.is_function())
                .unwrap_or(false)
        }
    }
}

/// Drain queued promise jobs, surfacing an exception left behind by one.
fn run_pending_jobs(ctx: &Ctx<'_>) -> Result<()> {
    while ctx.execute_pending_job() {}

    let exc = ctx.catch();
    if exc.is_exception() {
        return Err(exception_to_error(&exc).into());
    }
    Ok(())
}

/// Turn an rquickjs error into a [`ScriptError`], pulling the pending
/// exception out of the context when there is one.
fn script_error(ctx: &Ctx<'_>, err: rquickjs::Error) -> anyhow::Error {
    if err.is_exception() {
        let exc = ctx.catch();
        if !exc.is_undefined() && !exc.is_null() {
            return exception_to_error(&exc).into();
        }
    }
    anyhow!("{}", err)
}

fn exception_to_error(exc: &Value<'_>) -> ScriptError {
    if let Some(obj) = exc.as_object() {
        let name: String = obj
            .get::<_, String>("name")
            .unwrap_or_else(|_| "Error".to_string());
        let message: String = obj.get::<_, String>("message").unwrap_or_default();
        let stack = obj
            .get::<_, String>("stack")
            .ok()
            .filter(|s| !s.trim().is_empty());
        return ScriptError {
            message: format!("{}: {}", name, message),
            stack,
        };
    }

    if let Some(exception) = exc.as_exception() {
        return ScriptError {
            message: format!("Error: {}", exception.message().unwrap_or_default()),
            stack: exception.stack().filter(|s| !s.trim().is_empty()),
        };
    }

    let message = exc
        .as_string()
        .and_then(|s| s.to_string().ok())
        .unwrap_or_else(|| format!("{:?}", exc));
    ScriptError {
        message: format!("Uncaught {}", message),
        stack: None,
    }
}
