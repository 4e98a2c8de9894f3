//! devmenu - an interactive terminal menu for browsing and running example scripts
//!
//! This library provides script discovery under `<root>/src/<category>`, the
//! navigation state machine behind the menu, and in-process execution of the
//! chosen script with an embedded JavaScript engine.

pub mod config;
pub mod logging;
pub mod script;
pub mod ui;
