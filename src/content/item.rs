//! Collected content records.

use serde::{Serialize, Serializer};
use std::{collections::BTreeMap, io, path::PathBuf};
use thiserror::Error;

use super::frontmatter::FrontmatterError;
use crate::utils::date::DateTimeUtc;

/// Where an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Flat blog post from `content/`.
    Post,
    /// Garden note from `notes/`.
    Note,
}

impl ContentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Note => "note",
        }
    }
}

/// A rendered post or note.
///
/// Serialized as the `Post` / `Posts` data of page templates.
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub title: String,
    pub description: String,
    /// `None` when absent or unparsable; sorts as oldest.
    #[serde(serialize_with = "serialize_display_date")]
    pub date: Option<DateTimeUtc>,
    pub tags: Vec<String>,
    /// Rendered HTML body.
    pub content: String,
    /// Base URL + clean path, never ending in `.md`.
    pub url: String,
    pub slug: String,
    /// Clean path relative to the output directory (`notes/rust/borrowing`).
    #[serde(skip)]
    pub path: String,
    #[serde(skip)]
    pub source: PathBuf,
}

impl ContentItem {
    /// `Jan 02, 2006`, or empty for undated items.
    pub fn display_date(&self) -> String {
        self.date.map(DateTimeUtc::to_display).unwrap_or_default()
    }
}

fn serialize_display_date<S: Serializer>(
    date: &Option<DateTimeUtc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.map(DateTimeUtc::to_display).unwrap_or_default())
}

/// Sort newest first. Stable: equal and undated items keep encounter order,
/// undated items last.
pub fn sort_by_date_desc(items: &mut [ContentItem]) {
    items.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Why a markdown file was left out of the build.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("unreadable: {0}")]
    Unreadable(io::Error),

    #[error("not valid UTF-8")]
    NotUtf8,

    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}

/// A skipped file and the reason.
#[derive(Debug)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Lower-cased tag → items bearing it, in collection order.
#[derive(Debug, Default)]
pub struct TagIndex {
    tags: BTreeMap<String, Vec<ContentItem>>,
}

impl TagIndex {
    /// Index `item` once under each of its distinct lower-cased tags.
    pub fn add(&mut self, item: &ContentItem) {
        let mut keys: Vec<String> = item.tags.iter().map(|t| t.to_lowercase()).collect();
        keys.sort_unstable();
        keys.dedup();

        for key in keys {
            self.tags.entry(key).or_default().push(item.clone());
        }
    }

    pub fn get(&self, tag: &str) -> Option<&[ContentItem]> {
        self.tags.get(tag).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ContentItem])> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
