//! # Navigator
//!
//! The menu's state machine. A [`Navigator`] is either at the category
//! listing or browsing a category at some nested path. [`Navigator::menu`]
//! builds the entries for the current location from a fresh scan, and
//! [`Navigator::select`] applies the user's answer, returning the next
//! [`Step`] for the session loop.

use crate::script::{subtree, ScriptTree, TreeNode};
use crate::ui::choices::{category_choices, tree_choices, Choice, ChoiceValue};
use std::path::PathBuf;

/// Where the user currently is in the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Top-level category listing.
    Categories,
    /// Inside a category, `path` segments below its root.
    Browsing { root: String, path: Vec<String> },
}

/// What the session loop should do after a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Redraw,
    Run(PathBuf),
    Quit,
}

/// Everything the prompt needs to draw one menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub message: String,
    pub header: String,
    pub choices: Vec<Choice>,
}

/// Navigation state, passed through the session loop by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    location: Location,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            location: Location::Categories,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn is_browsing(&self) -> bool {
        matches!(self.location, Location::Browsing { .. })
    }

    /// Build the menu for the current location from a freshly scanned tree.
    ///
    /// If the location disappeared from disk since the last redraw, the path
    /// is trimmed to what still exists.
    pub fn menu(&mut self, categories: &ScriptTree) -> Menu {
        self.reconcile(categories);

        match &self.location {
            Location::Categories => Menu {
                message: "Select a category to browse:".to_string(),
                header: "📂 Root".to_string(),
                choices: category_choices(categories),
            },
            Location::Browsing { root, path } => {
                let empty = ScriptTree::new();
                let tree = match categories.get(root) {
                    Some(TreeNode::Directory(children)) => {
                        subtree(children, path).unwrap_or(&empty)
                    }
                    _ => &empty,
                };

                let prefix = if path.is_empty() {
                    String::new()
                } else {
                    format!("{}/", path.join("/"))
                };

                let mut choices = tree_choices(tree, &prefix);
                if path.is_empty() {
                    choices.push(Choice::back_to_root());
                }
                choices.push(Choice::exit());

                let header = if path.is_empty() {
                    format!("📂 {}", root)
                } else {
                    format!("📂 {}/{}", root, path.join("/"))
                };

                Menu {
                    message: format!("Select an item from {}:", root),
                    header,
                    choices,
                }
            }
        }
    }

    fn reconcile(&mut self, categories: &ScriptTree) {
        let Location::Browsing { root, path } = &mut self.location else {
            return;
        };

        let Some(TreeNode::Directory(children)) = categories.get(root.as_str()) else {
            tracing::debug!("Category '{}' no longer exists", root);
            self.location = Location::Categories;
            return;
        };

        while !path.is_empty() && subtree(children, path).is_none() {
            path.pop();
        }
    }

    /// Apply the user's answer. `None` means the prompt was cancelled.
    pub fn select(&mut self, answer: Option<ChoiceValue>) -> Step {
        let Some(answer) = answer else {
            if self.is_browsing() {
                tracing::info!("No answer provided. Exiting...");
            }
            return Step::Quit;
        };

        match answer {
            ChoiceValue::Exit => Step::Quit,
            ChoiceValue::Category(name) if !self.is_browsing() => {
                self.location = Location::Browsing {
                    root: name,
                    path: Vec::new(),
                };
                Step::Redraw
            }
            ChoiceValue::RootMenu => {
                self.location = Location::Categories;
                Step::Redraw
            }
            ChoiceValue::File(file) if self.is_browsing() => Step::Run(file),
            ChoiceValue::Directory(relative) => {
                if let Location::Browsing { path, .. } = &mut self.location {
                    *path = relative
                        .split('/')
                        .filter(|segment| !segment.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                Step::Redraw
            }
            ChoiceValue::Back => {
                // Popping an empty path keeps the user at the category root.
                if let Location::Browsing { path, .. } = &mut self.location {
                    path.pop();
                }
                Step::Redraw
            }
            other => {
                tracing::debug!("Ignoring '{}' at {:?}", other, self.location);
                Step::Redraw
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> ScriptTree {
        let mut pdf = ScriptTree::new();
        pdf.insert(
            "split.js".to_string(),
            TreeNode::File(PathBuf::from("/p/src/examples/pdf/split.js")),
        );

        let mut examples = ScriptTree::new();
        examples.insert("pdf".to_string(), TreeNode::Directory(pdf));
        examples.insert(
            "a.js".to_string(),
            TreeNode::File(PathBuf::from("/p/src/examples/a.js")),
        );

        let mut categories = ScriptTree::new();
        categories.insert("examples".to_string(), TreeNode::Directory(examples));
        categories
    }

    fn browsing(root: &str, path: &[&str]) -> Location {
        Location::Browsing {
            root: root.to_string(),
            path: path.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_starts_at_categories() {
        let mut nav = Navigator::new();
        let menu = nav.menu(&categories());

        assert_eq!(nav.location(), &Location::Categories);
        assert_eq!(menu.header, "📂 Root");
        assert_eq!(menu.choices.len(), 2);
    }

    #[test]
    fn test_select_category_enters_root() {
        let mut nav = Navigator::new();
        let step = nav.select(Some(ChoiceValue::Category("examples".to_string())));

        assert_eq!(step, Step::Redraw);
        assert_eq!(nav.location(), &browsing("examples", &[]));
    }

    #[test]
    fn test_menu_at_category_root_offers_back_to_root() {
        let mut nav = Navigator::new();
        nav.select(Some(ChoiceValue::Category("examples".to_string())));
        let menu = nav.menu(&categories());

        let values: Vec<ChoiceValue> = menu.choices.into_iter().map(|c| c.value).collect();
        assert_eq!(
            &values[values.len() - 2..],
            &[ChoiceValue::RootMenu, ChoiceValue::Exit]
        );
        assert!(!values.contains(&ChoiceValue::Back));
        assert_eq!(menu.message, "Select an item from examples:");
    }

    #[test]
    fn test_into_directory_then_back() {
        let mut nav = Navigator::new();
        nav.select(Some(ChoiceValue::Category("examples".to_string())));
        let before = nav.location().clone();

        nav.select(Some(ChoiceValue::Directory("pdf".to_string())));
        assert_eq!(nav.location(), &browsing("examples", &["pdf"]));

        let menu = nav.menu(&categories());
        assert_eq!(menu.header, "📂 examples/pdf");
        assert!(!menu
            .choices
            .iter()
            .any(|c| c.value == ChoiceValue::RootMenu));

        nav.select(Some(ChoiceValue::Back));
        assert_eq!(nav.location(), &before);
    }

    #[test]
    fn test_back_at_empty_path_is_noop() {
        let mut nav = Navigator::new();
        nav.select(Some(ChoiceValue::Category("examples".to_string())));

        let step = nav.select(Some(ChoiceValue::Back));
        assert_eq!(step, Step::Redraw);
        assert_eq!(nav.location(), &browsing("examples", &[]));
    }

    #[test]
    fn test_root_menu_returns_to_categories() {
        let mut nav = Navigator::new();
        nav.select(Some(ChoiceValue::Category("examples".to_string())));
        nav.select(Some(ChoiceValue::RootMenu));
        assert_eq!(nav.location(), &Location::Categories);
    }

    #[test]
    fn test_file_selection_runs_and_keeps_location() {
        let mut nav = Navigator::new();
        nav.select(Some(ChoiceValue::Category("examples".to_string())));
        nav.select(Some(ChoiceValue::Directory("pdf".to_string())));

        let file = PathBuf::from("/p/src/examples/pdf/split.js");
        let step = nav.select(Some(ChoiceValue::File(file.clone())));

        assert_eq!(step, Step::Run(file));
        assert_eq!(nav.location(), &browsing("examples", &["pdf"]));
    }

    #[test]
    fn test_exit_and_cancel_quit() {
        let mut nav = Navigator::new();
        assert_eq!(nav.select(Some(ChoiceValue::Exit)), Step::Quit);
        assert_eq!(nav.select(None), Step::Quit);

        nav.select(Some(ChoiceValue::Category("examples".to_string())));
        assert_eq!(nav.select(None), Step::Quit);
    }

    #[test]
    fn test_nested_directory_entry_sets_full_path() {
        let mut nav = Navigator::new();
        nav.select(Some(ChoiceValue::Category("examples".to_string())));
        nav.select(Some(ChoiceValue::Directory("a/b/c".to_string())));
        assert_eq!(nav.location(), &browsing("examples", &["a", "b", "c"]));
    }

    #[test]
    fn test_menu_trims_vanished_path() {
        let mut nav = Navigator::new();
        nav.select(Some(ChoiceValue::Category("examples".to_string())));
        nav.select(Some(ChoiceValue::Directory("pdf/gone".to_string())));

        let menu = nav.menu(&categories());
        assert_eq!(nav.location(), &browsing("examples", &["pdf"]));
        assert_eq!(menu.header, "📂 examples/pdf");
    }

    #[test]
    fn test_menu_leaves_vanished_category() {
        let mut nav = Navigator::new();
        nav.select(Some(ChoiceValue::Category("removed".to_string())));

        let menu = nav.menu(&categories());
        assert_eq!(nav.location(), &Location::Categories);
        assert_eq!(menu.message, "Select a category to browse:");
    }
}
