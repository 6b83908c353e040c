//! Notes navigation tree.
//!
//! The walk over `notes/` is shared with content collection: [`walk_notes`]
//! builds the tree and reports every file to a [`NotesVisitor`], so a full
//! build reads the directory exactly once.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::frontmatter::parse_frontmatter;
use crate::{config::NOTES_INDEX, utils::path::clean_url_path};

/// Directory holding note images; traversed for assets only.
pub const IMAGES_DIR: &str = "images";

/// One entry of the notes navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    /// Empty for directories.
    pub url: String,
    pub is_dir: bool,
    /// `None` for directories.
    pub title: Option<String>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn dir(name: String, children: Vec<TreeNode>) -> Self {
        Self {
            name,
            url: String::new(),
            is_dir: true,
            title: None,
            children,
        }
    }

    pub fn note(name: String, title: String, url: String) -> Self {
        Self {
            name,
            url,
            is_dir: false,
            title: Some(title),
            children: Vec::new(),
        }
    }
}

/// Receives the files found while walking `notes/`.
pub trait NotesVisitor {
    /// A markdown note. Returns its title, or `None` to fall back to the file name.
    fn note(&mut self, path: &Path, rel: &Path) -> Option<String>;

    /// The root `_index.md`.
    fn home(&mut self, path: &Path);

    /// Any non-markdown file, and everything under `images/`.
    fn asset(&mut self, path: &Path, rel: &Path);
}

/// URL of a note relative to the notes root.
pub fn note_url(base_url: &str, rel: &Path) -> String {
    format!("{base_url}notes/{}", clean_url_path(rel))
}

/// Walk `root`, returning its navigation tree.
///
/// A missing `root` yields an empty tree. Any other directory read failure
/// is returned as an error.
pub fn walk_notes(root: &Path, base_url: &str, visitor: &mut impl NotesVisitor) -> Result<Vec<TreeNode>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut walker = Walker { base_url, visitor };
    walker.walk(root, Path::new(""), true)
}

/// Build the navigation tree alone, reading only frontmatter titles.
pub fn build_notes_tree(root: &Path, base_url: &str) -> Result<Vec<TreeNode>> {
    walk_notes(root, base_url, &mut TitlesOnly)
}

struct Walker<'a, V> {
    base_url: &'a str,
    visitor: &'a mut V,
}

impl<V: NotesVisitor> Walker<'_, V> {
    /// `in_tree` is false below `images/`: files there are assets only.
    fn walk(&mut self, dir: &Path, rel: &Path, in_tree: bool) -> Result<Vec<TreeNode>> {
        let mut nodes = Vec::new();

        for (name, path, is_dir) in read_sorted(dir)? {
            if name.starts_with('.') {
                continue;
            }
            let child_rel = rel.join(&name);

            if is_dir {
                let child_in_tree = in_tree && name != IMAGES_DIR;
                let children = self.walk(&path, &child_rel, child_in_tree)?;
                if child_in_tree {
                    nodes.push(TreeNode::dir(name, children));
                }
            } else if !in_tree {
                self.visitor.asset(&path, &child_rel);
            } else if name == NOTES_INDEX {
                if rel.as_os_str().is_empty() {
                    self.visitor.home(&path);
                }
            } else if name.ends_with(".md") {
                let title = self.visitor.note(&path, &child_rel).unwrap_or_else(|| name.clone());
                let url = note_url(self.base_url, &child_rel);
                nodes.push(TreeNode::note(name, title, url));
            } else {
                self.visitor.asset(&path, &child_rel);
            }
        }

        Ok(nodes)
    }
}

/// Directory entries as `(file name, path, is_dir)`, sorted by file name.
fn read_sorted(dir: &Path) -> Result<Vec<(String, PathBuf, bool)>> {
    let read = |dir: &Path| -> io::Result<Vec<(String, PathBuf, bool)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let is_dir = entry.file_type()?.is_dir();
            entries.push((entry.file_name().to_string_lossy().into_owned(), entry.path(), is_dir));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    };
    read(dir).with_context(|| format!("failed to read notes directory {}", dir.display()))
}

/// Visitor for a navigation-only walk.
struct TitlesOnly;

impl NotesVisitor for TitlesOnly {
    fn note(&mut self, path: &Path, _rel: &Path) -> Option<String> {
        let text = fs::read_to_string(path).ok()?;
        let (meta, _) = parse_frontmatter(&text).ok()?;
        meta.non_empty("title").map(str::to_string)
    }

    fn home(&mut self, _path: &Path) {}

    fn asset(&mut self, _path: &Path, _rel: &Path) {}
}
