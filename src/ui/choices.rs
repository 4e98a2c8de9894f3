//! # Menu Choices
//!
//! Turns a script tree into the flat list of entries shown by the select
//! prompt. Directories come first, then files, each group in name order, and
//! every directory is immediately followed by its own contents one level
//! deeper:
//!
//! ```text
//! ├── 📁 pdf/
//!   └── 📄 split.js
//! ├── 📄 a.js
//! └── 📄 b.js
//! └── 🔙 ..
//! ```

use crate::script::{ScriptTree, TreeNode};
use anyhow::{bail, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// What selecting an entry means. Renders to and parses from
/// `root:<name>`, `dir:<relative-path>`, `file:<absolute-path>`, `back`,
/// `root` and `exit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceValue {
    /// Open a category from the top-level listing.
    Category(String),
    /// Enter a directory, by path relative to the category root.
    Directory(String),
    /// Run a script.
    File(PathBuf),
    /// Leave the current directory.
    Back,
    /// Return to the category listing.
    RootMenu,
    Exit,
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceValue::Category(name) => write!(f, "root:{}", name),
            ChoiceValue::Directory(path) => write!(f, "dir:{}", path),
            ChoiceValue::File(path) => write!(f, "file:{}", path.display()),
            ChoiceValue::Back => f.write_str("back"),
            ChoiceValue::RootMenu => f.write_str("root"),
            ChoiceValue::Exit => f.write_str("exit"),
        }
    }
}

impl FromStr for ChoiceValue {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = match s {
            "back" => ChoiceValue::Back,
            "root" => ChoiceValue::RootMenu,
            "exit" => ChoiceValue::Exit,
            _ => {
                if let Some(name) = s.strip_prefix("root:") {
                    ChoiceValue::Category(name.to_string())
                } else if let Some(path) = s.strip_prefix("dir:") {
                    ChoiceValue::Directory(path.to_string())
                } else if let Some(path) = s.strip_prefix("file:") {
                    ChoiceValue::File(PathBuf::from(path))
                } else {
                    bail!("Unknown menu value '{}'", s);
                }
            }
        };
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    Directory,
    File,
    Navigation,
}

/// One selectable line of the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub title: String,
    pub value: ChoiceValue,
    pub description: String,
}

impl Choice {
    pub fn new(
        title: impl Into<String>,
        value: ChoiceValue,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            value,
            description: description.into(),
        }
    }

    pub fn kind(&self) -> ChoiceKind {
        match self.value {
            ChoiceValue::Category(_) | ChoiceValue::Directory(_) => ChoiceKind::Directory,
            ChoiceValue::File(_) => ChoiceKind::File,
            ChoiceValue::Back | ChoiceValue::RootMenu | ChoiceValue::Exit => {
                ChoiceKind::Navigation
            }
        }
    }

    pub fn exit() -> Self {
        Self::new("❌ Exit", ChoiceValue::Exit, "Exit debug menu")
    }

    pub fn back_to_root() -> Self {
        Self::new(
            "🔙 Back to Root",
            ChoiceValue::RootMenu,
            "Go back to main categories",
        )
    }
}

fn connector(is_last: bool) -> &'static str {
    if is_last {
        "└── "
    } else {
        "├── "
    }
}

/// Choices for the children of `tree`.
///
/// `prefix` is the path of `tree` relative to its category root, ending in
/// `/`, or empty at the root itself. A non-empty prefix gets a single trailing
/// "go back" entry.
pub fn tree_choices(tree: &ScriptTree, prefix: &str) -> Vec<Choice> {
    let mut choices = Vec::new();
    push_entries(tree, prefix, 0, &mut choices);

    if !prefix.is_empty() {
        choices.push(Choice::new("└── 🔙 ..", ChoiceValue::Back, "Go back"));
    }

    choices
}

fn push_entries(tree: &ScriptTree, prefix: &str, level: usize, choices: &mut Vec<Choice>) {
    let indent = "  ".repeat(level);

    // BTreeMap iteration is already alphabetical; the stable sort only moves
    // directories ahead of files.
    let mut items: Vec<(&String, &TreeNode)> = tree.iter().collect();
    items.sort_by_key(|(_, node)| !node.is_directory());

    let count = items.len();
    for (i, (name, node)) in items.into_iter().enumerate() {
        let connector = connector(i + 1 == count);
        match node {
            TreeNode::Directory(children) => {
                choices.push(Choice::new(
                    format!("{}{}📁 {}/", indent, connector, name),
                    ChoiceValue::Directory(format!("{}{}", prefix, name)),
                    format!("Browse directory: {}", name),
                ));
                push_entries(children, &format!("{}{}/", prefix, name), level + 1, choices);
            }
            TreeNode::File(path) => {
                choices.push(Choice::new(
                    format!("{}{}📄 {}", indent, connector, name),
                    ChoiceValue::File(path.clone()),
                    format!("Run example: {}", name),
                ));
            }
        }
    }
}

/// Top-level listing: one entry per category, then "Exit".
pub fn category_choices(categories: &ScriptTree) -> Vec<Choice> {
    let count = categories.len();
    let mut choices: Vec<Choice> = categories
        .keys()
        .enumerate()
        .map(|(i, name)| {
            Choice::new(
                format!("{}📁 {}/", connector(i + 1 == count), name),
                ChoiceValue::Category(name.clone()),
                format!("Browse {} directory", name),
            )
        })
        .collect();

    choices.push(Choice::exit());
    choices
}
