//! Site directory layout.
//!
//! Single source of truth for where inputs are read from and outputs are
//! written to, all relative to the site root.

use std::path::{Path, PathBuf};

/// Config file name at the site root.
pub const CONFIG_FILE: &str = "config.json";

/// Notes homepage source, excluded from navigation and search.
pub const NOTES_INDEX: &str = "_index.md";

/// Directory layout of one site.
#[derive(Debug, Clone)]
pub struct SitePaths {
    root: PathBuf,
}

impl SitePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Flat blog posts.
    pub fn content_dir(&self) -> PathBuf {
        self.root.join("content")
    }

    /// Recursive notes tree.
    pub fn notes_dir(&self) -> PathBuf {
        self.root.join("notes")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    /// Directories mirrored verbatim into the output as `<name>/`.
    pub fn static_dirs(&self) -> [(PathBuf, &'static str); 2] {
        [
            (self.root.join("static"), "static"),
            (self.root.join("assets"), "assets"),
        ]
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("public")
    }

    /// Join a path with the output directory.
    pub fn output_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.output_dir().join(path)
    }
}
