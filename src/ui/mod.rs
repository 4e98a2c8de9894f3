//! # UI Module
//!
//! The interactive side of devmenu.
//!
//! ## Components
//!
//! - [`Navigator`] - where the user is (category + path) and how answers move it
//! - [`mod@choices`] - turning a script tree into menu entries
//! - [`mod@prompt`] - the select list and "press Enter" prompts
//! - [`mod@render`] - drawing the select list with ratatui
//! - [`mod@session`] - the redraw / prompt / run loop tying it together
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │ 📂 examples/pdf                                  │
//! ├─ Select an item from examples: ─────────────────┤
//! │ » ├── 📁 split/                                  │
//! │     └── 📄 pages.js                              │
//! │   └── 📄 merge.js                                │
//! │   └── 🔙 ..                                      │
//! │   ❌ Exit                                        │
//! ├─────────────────────────────────────────────────┤
//! │ Browse directory: split                          │
//! └─────────────────────────────────────────────────┘
//!  [↑↓/jk] Navigate  [Enter] Select  [Esc/q] Quit
//! ```

pub mod app;
pub mod choices;
pub mod prompt;
pub mod render;
pub mod session;
pub mod theme;

pub use app::{Location, Menu, Navigator, Step};
pub use choices::{Choice, ChoiceKind, ChoiceValue};
pub use prompt::{Prompter, TerminalPrompter};
pub use session::run_session;
