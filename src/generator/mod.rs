//! Output generation.
//!
//! Writes everything under `public/` from the collected content:
//!
//! - **Pages**: post/note pages, index, notes, tag pages, 404 (`pages`)
//! - **Search**: `search.json` for client-side search (`search`)
//! - **Sitemap**: `sitemap.xml` and `robots.txt` (`sitemap`)
//! - **Feed**: `rss.xml` (`feed`)
//! - **Assets**: `static/`, `assets/` and note assets, copied verbatim (`assets`)
//!
//! Failures while writing a page or a global file abort the build. Asset
//! copies and tag pages are logged and skipped.

pub mod assets;
pub mod feed;
pub mod pages;
pub mod search;
pub mod sitemap;

use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs, path::Path};

use crate::{
    config::{SiteConfig, SitePaths},
    content::{Collection, TreeNode, sort_by_date_desc},
    log,
    render::TemplateSet,
};

/// Homepage body when `notes/_index.md` is absent.
pub const DEFAULT_HOME_CONTENT: &str = "<p>Welcome to my digital garden.</p>";

/// Netlify / Cloudflare Pages fallback rule.
const REDIRECTS: &str = "/* /404.html 404\n";

/// Site-wide data handed to every template as `Site`.
#[derive(Debug, Clone, Serialize)]
pub struct Site {
    #[serde(flatten)]
    pub config: SiteConfig,
    /// Rendered HTML of `notes/_index.md`.
    pub home_content: String,
    pub notes_tree: Vec<TreeNode>,
}

impl Site {
    pub fn new(config: SiteConfig, home_content: Option<String>, notes_tree: Vec<TreeNode>) -> Self {
        Self {
            config,
            home_content: home_content.unwrap_or_else(|| DEFAULT_HOME_CONTENT.to_string()),
            notes_tree,
        }
    }
}

/// Writes rendered templates and files below the output directory.
pub struct Output<'a> {
    pub paths: &'a SitePaths,
    pub site: &'a Site,
    pub templates: &'a TemplateSet,
}

impl Output<'_> {
    /// Render `template` with `ctx` into `rel` (relative to `public/`).
    pub fn render_to<S: Serialize>(&self, template: &str, ctx: S, rel: impl AsRef<Path>) -> Result<()> {
        let html = self.templates.render(template, ctx)?;
        self.write(rel, html)
    }

    /// Write `content` to `rel` (relative to `public/`), creating parents.
    pub fn write(&self, rel: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Result<()> {
        let path = self.paths.output_join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Generate every output file for one build.
pub fn generate(out: &Output<'_>, content: &mut Collection) -> Result<()> {
    pages::write_item_pages(out, &content.posts)?;
    pages::write_item_pages(out, &content.notes)?;
    log!("build"; "{} posts, {} notes", content.posts.len(), content.notes.len());

    let mut posts = content.posts.clone();
    sort_by_date_desc(&mut posts);
    let mut notes = content.notes.clone();
    sort_by_date_desc(&mut notes);

    pages::write_index(out, &posts)?;
    pages::write_notes(out, &notes)?;
    content.report.tag_pages_failed = pages::write_tag_pages(out, &content.tags);
    pages::write_not_found(out)?;
    out.write("_redirects", REDIRECTS)?;

    out.write("search.json", search::build_search_index(&posts, &content.notes)?)?;
    out.write("sitemap.xml", sitemap::build_sitemap(&out.site.config.base_url, &posts, &content.notes))?;
    out.write("robots.txt", sitemap::build_robots(&out.site.config.base_url))?;
    out.write("rss.xml", feed::build_rss(&out.site.config, &content.posts, &content.notes))?;

    let copied = assets::copy_all(out.paths, &content.assets);
    content.report.assets_copied = copied.copied;
    content.report.assets_failed = copied.failed;
    Ok(())
}
