//! Frontmatter extraction.
//!
//! A document may start with a `---` delimited block of `key: value` lines:
//!
//! ```text
//! ---
//! title: Borrowing
//! date: 2024-03-01
//! tags: ["rust", "memory"]
//! ---
//! # Body
//! ```
//!
//! Values are kept as raw strings; consumers interpret the keys they know.

use thiserror::Error;

/// Delimiter line opening and closing a frontmatter block.
const DELIMITER: &str = "---\n";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontmatterError {
    #[error("malformed frontmatter: missing closing `---` line")]
    Malformed,
}

/// Ordered `key: value` mapping.
///
/// Re-inserting a key overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, String)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key` when present and non-empty.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

}

/// Split a document into its frontmatter and markdown body.
///
/// Without a leading delimiter the whole input is the body and the mapping is
/// empty. With one, the input is split on the first two delimiter
/// occurrences; a missing second delimiter is [`FrontmatterError::Malformed`].
pub fn parse_frontmatter(content: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
    if !content.starts_with(DELIMITER) {
        return Ok((Frontmatter::new(), content));
    }

    let mut parts = content.splitn(3, DELIMITER);
    let (Some(_), Some(block), Some(body)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FrontmatterError::Malformed);
    };

    let mut meta = Frontmatter::new();
    for line in block.lines() {
        // A leading colon means an empty key, which is not a pair.
        if let Some((key, value)) = line.split_once(':')
            && !key.is_empty()
        {
            meta.insert(key.trim(), value.trim());
        }
    }

    Ok((meta, body))
}

/// Parse a tag list value.
///
/// Accepts bracketed and quoted lists alike: `["go","web"]`, `[go, web]` and
/// `'go', 'web'` all yield `["go", "web"]`.
pub fn parse_tags(value: &str) -> Vec<String> {
    value
        .trim_matches(|c| c == '[' || c == ']')
        .replace(['"', '\''], "")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
