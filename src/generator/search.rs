//! Client-side search index (`search.json`).

use anyhow::{Context, Result};
use serde::Serialize;

use crate::content::ContentItem;

/// One searchable document. All fields are strings.
#[derive(Debug, Serialize)]
struct SearchRecord<'a> {
    title: &'a str,
    url: &'a str,
    /// `Jan 02, 2006`, or empty.
    date: String,
    /// Full rendered HTML.
    content: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    /// Comma-joined, as written in frontmatter.
    tags: String,
}

impl<'a> From<&'a ContentItem> for SearchRecord<'a> {
    fn from(item: &'a ContentItem) -> Self {
        Self {
            title: &item.title,
            url: &item.url,
            date: item.display_date(),
            content: &item.content,
            kind: item.kind.as_str(),
            tags: item.tags.join(","),
        }
    }
}

/// Serialize posts, then notes, into the search index JSON array.
pub fn build_search_index(posts: &[ContentItem], notes: &[ContentItem]) -> Result<String> {
    let records: Vec<SearchRecord<'_>> = posts.iter().chain(notes).map(SearchRecord::from).collect();
    serde_json::to_string(&records).context("Failed to serialize search index")
}
