use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A node of the discovered script tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// A directory holding at least one script, directly or transitively.
    Directory(ScriptTree),
    /// A script file, by absolute path.
    File(PathBuf),
}

/// Children of a directory, keyed by file name. `BTreeMap` keeps names sorted.
pub type ScriptTree = BTreeMap<String, TreeNode>;

impl TreeNode {
    pub fn is_directory(&self) -> bool {
        matches!(self, TreeNode::Directory(_))
    }
}

/// What counts as a script and which entries are never descended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Folder under the project root whose child directories are categories.
    pub source_dir: String,
    /// Script file extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Entry names skipped wherever they appear (build artifacts, caches).
    pub skip_dirs: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            source_dir: "src".to_string(),
            extensions: vec!["js".to_string()],
            skip_dirs: vec!["node_modules".to_string()],
        }
    }
}

impl DiscoveryOptions {
    fn is_skipped(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.skip_dirs.iter().any(|skip| skip == name))
    }

    fn is_script(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// Build the script tree below `root`.
///
/// Directories without any script below them never show up, and a missing
/// `root` simply yields an empty tree.
pub fn build_tree(root: &Path, options: &DiscoveryOptions) -> ScriptTree {
    let mut tree = ScriptTree::new();

    if !root.is_dir() {
        return tree;
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !options.is_skipped(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Failed to read directory entry: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_file() || !options.is_script(entry.path()) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        insert_file(&mut tree, &segments, entry.path().to_path_buf());
    }

    tree
}

fn insert_file(tree: &mut ScriptTree, segments: &[String], path: PathBuf) {
    match segments {
        [] => {}
        [name] => {
            tree.insert(name.clone(), TreeNode::File(path));
        }
        [dir, rest @ ..] => {
            let node = tree
                .entry(dir.clone())
                .or_insert_with(|| TreeNode::Directory(ScriptTree::new()));
            if let TreeNode::Directory(children) = node {
                insert_file(children, rest, path);
            }
        }
    }
}

/// Discover the categories of a project: every directory directly under
/// `<project_root>/<source_dir>` that contains scripts.
///
/// Plain files and `__`-prefixed entries at this level are ignored.
pub fn discover_categories(project_root: &Path, options: &DiscoveryOptions) -> ScriptTree {
    let source_dir = project_root.join(&options.source_dir);
    let mut categories = ScriptTree::new();

    if !source_dir.is_dir() {
        return categories;
    }

    for entry in WalkDir::new(&source_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Failed to read directory entry: {}", err);
                None
            }
        })
    {
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        if name.starts_with("__") || !entry.file_type().is_dir() {
            continue;
        }

        let subtree = build_tree(entry.path(), options);
        if !subtree.is_empty() {
            categories.insert(name.to_string(), TreeNode::Directory(subtree));
        }
    }

    categories
}

/// Look up the directory at `segments` below `tree`.
pub fn subtree<'a>(tree: &'a ScriptTree, segments: &[String]) -> Option<&'a ScriptTree> {
    segments.iter().try_fold(tree, |current, segment| match current.get(segment) {
        Some(TreeNode::Directory(children)) => Some(children),
        _ => None,
    })
}
