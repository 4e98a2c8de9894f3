//! # Session Loop
//!
//! One iteration per menu redraw:
//!
//! 1. rescan the script tree from disk (no caching, so edits show up on the
//!    next redraw),
//! 2. ask the [`Navigator`] for the menu at its location,
//! 3. prompt for an answer and hand it back to the navigator,
//! 4. run the chosen script, if any, then wait for the user before redrawing.
//!
//! The loop ends only when the user picks "Exit" or cancels a prompt.

use crate::script::{run_script_file, ScriptLoader, ScriptTree};
use crate::ui::app::{Navigator, Step};
use crate::ui::prompt::Prompter;
use anyhow::Result;

pub const CONTINUE_PROMPT: &str = "\nPress Enter to continue...";

pub fn run_session<F>(
    navigator: &mut Navigator,
    mut discover: F,
    prompter: &mut dyn Prompter,
    loader: &dyn ScriptLoader,
) -> Result<()>
where
    F: FnMut() -> ScriptTree,
{
    loop {
        let categories = discover();
        let menu = navigator.menu(&categories);

        tracing::debug!("{}", menu.header);

        let answer = prompter.select(&menu)?;

        match navigator.select(answer) {
            Step::Redraw => {}
            Step::Quit => break,
            Step::Run(path) => {
                let outcome = run_script_file(loader, &path);
                tracing::debug!("{} finished: {:?}", path.display(), outcome);

                if !prompter.acknowledge(CONTINUE_PROMPT)? {
                    break;
                }
            }
        }
    }

    Ok(())
}
