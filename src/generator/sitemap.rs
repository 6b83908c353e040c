//! Sitemap and robots.txt generation.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!   </url>
//!   <url>
//!     <loc>https://example.com/hello</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{content::ContentItem, utils::html::escape_xml};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Build `sitemap.xml`: homepage, notes index, then every post and note.
pub fn build_sitemap(base_url: &str, posts: &[ContentItem], notes: &[ContentItem]) -> String {
    let mut urls = vec![
        UrlEntry {
            loc: base_url.to_string(),
            lastmod: None,
        },
        UrlEntry {
            loc: format!("{base_url}notes.html"),
            lastmod: None,
        },
    ];
    urls.extend(posts.iter().chain(notes).map(|item| UrlEntry {
        loc: item.url.clone(),
        lastmod: item.date.map(|d| d.to_iso_date()),
    }));

    Sitemap { urls }.into_xml()
}

/// Build `robots.txt` allowing everything and pointing at the sitemap.
pub fn build_robots(base_url: &str) -> String {
    format!("User-agent: *\nAllow: /\n\nSitemap: {base_url}sitemap.xml\n")
}

struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
}

impl Sitemap {
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n");
            if let Some(lastmod) = entry.lastmod {
                xml.push_str("    <lastmod>");
                xml.push_str(&lastmod);
                xml.push_str("</lastmod>\n");
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}
