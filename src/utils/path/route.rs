//! Clean URL helpers.
//!
//! Source files map to extension-less URL paths that are served through the
//! directory-plus-`index.html` convention:
//!
//! ```text
//! notes/rust/borrowing.md  ->  notes/rust/borrowing  ->  public/notes/rust/borrowing/index.html
//! ```

use std::path::{Component, Path};

/// Markdown source extension stripped from URLs.
const MARKDOWN_EXT: &str = ".md";

/// Convert a relative source path to a clean URL path.
///
/// Components are joined with `/` regardless of platform and a trailing
/// `.md` is removed.
///
/// # Examples
/// ```ignore
/// assert_eq!(clean_url_path(Path::new("rust/borrowing.md")), "rust/borrowing");
/// ```
pub fn clean_url_path(relative: &Path) -> String {
    let joined = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    match joined.strip_suffix(MARKDOWN_EXT) {
        Some(stripped) => stripped.to_string(),
        None => joined,
    }
}

/// Ensure a base URL ends with exactly one `/`.
///
/// Empty input becomes `/`.
#[inline]
pub fn with_trailing_slash(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

/// File name stem for a tag page, `tags/<slug>.html`.
///
/// Path separators and control characters become `-`, so the page stays
/// inside `tags/`. Returns `None` when nothing but dots would remain.
pub fn tag_slug(tag: &str) -> Option<String> {
    let slug: String = tag
        .chars()
        .map(|c| if matches!(c, '/' | '\\') || c.is_control() { '-' } else { c })
        .collect();
    if slug.trim_matches('.').is_empty() {
        None
    } else {
        Some(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_url_path_strips_md() {
        assert_eq!(clean_url_path(Path::new("x.md")), "x");
        assert_eq!(
            clean_url_path(Path::new("rust/borrowing.md")),
            "rust/borrowing"
        );
    }

    #[test]
    fn test_clean_url_path_keeps_other_extensions() {
        assert_eq!(
            clean_url_path(Path::new("images/cat.png")),
            "images/cat.png"
        );
    }

    #[test]
    fn test_clean_url_path_only_strips_suffix() {
        assert_eq!(clean_url_path(Path::new("a.md.bak")), "a.md.bak");
    }

    #[test]
    fn test_with_trailing_slash() {
        assert_eq!(with_trailing_slash(""), "/");
        assert_eq!(with_trailing_slash("/"), "/");
        assert_eq!(
            with_trailing_slash("https://example.com"),
            "https://example.com/"
        );
        assert_eq!(
            with_trailing_slash("https://example.com/blog//"),
            "https://example.com/blog/"
        );
    }

    #[test]
    fn test_tag_slug_keeps_plain_tags() {
        assert_eq!(tag_slug("rust").as_deref(), Some("rust"));
        assert_eq!(tag_slug("c++").as_deref(), Some("c++"));
        assert_eq!(tag_slug("web dev").as_deref(), Some("web dev"));
        assert_eq!(tag_slug("日本語").as_deref(), Some("日本語"));
    }

    #[test]
    fn test_tag_slug_has_no_separators() {
        assert_eq!(tag_slug("../index").as_deref(), Some("..-index"));
        assert_eq!(
            tag_slug("../../templates/post").as_deref(),
            Some("..-..-templates-post")
        );
        assert_eq!(tag_slug("a\\b\tc").as_deref(), Some("a-b-c"));
    }

    #[test]
    fn test_tag_slug_rejects_dot_only() {
        assert_eq!(tag_slug(""), None);
        assert_eq!(tag_slug("."), None);
        assert_eq!(tag_slug(".."), None);
    }
}
