//! # devmenu CLI Entry Point
//!
//! Browse the example scripts of a project and run them in-process.
//!
//! ## Usage
//!
//! ```bash
//! # Use current directory
//! devmenu
//!
//! # Use a specific project root
//! devmenu --path /path/to/project
//!
//! # Run one script and exit
//! devmenu --file ./src/examples/merge.js
//!
//! # Debug mode - print the discovered tree and exit
//! devmenu --debug
//! ```
//!
//! ## Architecture
//!
//! 1. **Discovery**: every redraw rescans `<root>/src/<category>` for scripts
//! 2. **Navigation**: the menu walks categories and nested directories
//! 3. **Execution**: the chosen script is evaluated by an embedded JavaScript
//!    engine; `main()` is called when present, otherwise its top-level names
//!    are listed
//!
//! ## Key Bindings
//!
//! - `j` / `Down` - Move selection down
//! - `k` / `Up` - Move selection up
//! - `g` / `Home`, `G` / `End` - Jump to first / last entry
//! - `Enter` - Select
//! - `q` / `Esc` / `Ctrl+c` - Quit

use devmenu::config::Config;
use devmenu::logging;
use devmenu::script::{self, DiscoveryOptions, QuickJsLoader, ScriptTree, TreeNode};
use devmenu::ui::prompt::{force_restore_terminal, CrosstermEventReader};
use devmenu::ui::theme::Theme;
use devmenu::ui::{self, Navigator, TerminalPrompter};

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::panic;
use std::path::{Path, PathBuf};

/// devmenu - browse and run example scripts from an interactive menu
#[derive(Parser, Debug)]
#[command(name = "devmenu")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive menu for browsing and running example scripts", long_about = None)]
struct Args {
    /// Project root holding the source directory with script categories
    #[arg(short, long, value_name = "DIR", conflicts_with = "file")]
    path: Option<PathBuf>,

    /// Run a single script file and exit
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        conflicts_with = "path"
    )]
    file: Option<PathBuf>,

    /// Print the discovered script tree and exit
    #[arg(long)]
    debug: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    logging::init_global(level);

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        force_restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_application(args, &Config::load());

    let _ = panic::take_hook();

    result
}

fn run_application(args: Args, config: &Config) -> Result<()> {
    let options = config.discovery_options();

    if let Some(file_path) = args.file {
        let canonical_path = file_path
            .canonicalize()
            .with_context(|| format!("Failed to access file: {}", file_path.display()))?;

        // Failures are already reported and never change the exit status
        let loader = QuickJsLoader::new()?;
        let outcome = script::run_script_file(&loader, &canonical_path);
        tracing::debug!("{} finished: {:?}", canonical_path.display(), outcome);
        return Ok(());
    }

    let root = match args.path {
        Some(path) => path
            .canonicalize()
            .with_context(|| format!("Failed to access directory: {}", path.display()))?,
        None => std::env::current_dir().context("Failed to get current working directory")?,
    };

    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }

    if args.debug {
        print_debug_tree(&root, &options);
        return Ok(());
    }

    let categories = script::discover_categories(&root, &options);
    if categories.is_empty() {
        tracing::warn!(
            "No scripts found under {}",
            root.join(&options.source_dir).display()
        );
    }

    let loader = QuickJsLoader::new()?;
    let theme = Theme::resolve(&config.theme);
    let mut prompter = TerminalPrompter::new(CrosstermEventReader, theme);
    let mut navigator = Navigator::new();

    ui::run_session(
        &mut navigator,
        || script::discover_categories(&root, &options),
        &mut prompter,
        &loader,
    )
}

fn print_debug_tree(root: &Path, options: &DiscoveryOptions) {
    let categories = script::discover_categories(root, options);

    println!("=== Discovered Scripts ===");
    println!("Root: {}", root.join(&options.source_dir).display());
    if categories.is_empty() {
        println!("  (none)");
    }
    print_tree(&categories, 1);
}

fn print_tree(tree: &ScriptTree, depth: usize) {
    let indent = "  ".repeat(depth);
    for (name, node) in tree {
        match node {
            TreeNode::Directory(children) => {
                println!("{}{}/", indent, name);
                print_tree(children, depth + 1);
            }
            TreeNode::File(path) => println!("{}{}  ({})", indent, name, path.display()),
        }
    }
}
