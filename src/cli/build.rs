//! Site building orchestration.
//!
//! Build pipeline phases:
//! - **Load** - `config.json` and the template set (both fatal on error)
//! - **Collect** - posts from `content/`, one walk over `notes/`
//! - **Clean** - remove and recreate `public/`
//! - **Generate** - pages, search index, sitemap, feed, asset copies
//!
//! Nothing under `public/` is touched until configuration and templates have
//! loaded, so a broken template leaves the previous output in place.

use anyhow::{Context, Result};
use std::{fs, io, path::Path};

use crate::{
    config::{SiteConfig, SitePaths},
    content::{self, BuildReport},
    debug,
    generator::{self, Output, Site},
    log,
    render::{MarkdownRenderer, TemplateSet},
};

/// Build the site rooted at `root`.
pub fn build_site(root: &Path) -> Result<BuildReport> {
    let paths = SitePaths::new(root);

    let config = SiteConfig::load(&paths)?;
    debug!("config"; "{:?}", config);

    let templates = TemplateSet::load(paths.templates_dir())?;
    let renderer = MarkdownRenderer::new()?;

    let mut collection = content::collect(&paths, &config, &renderer)?;

    reset_output_dir(&paths.output_dir())?;

    let site = Site::new(
        config,
        collection.home_content.take(),
        std::mem::take(&mut collection.notes_tree),
    );
    let out = Output {
        paths: &paths,
        site: &site,
        templates: &templates,
    };
    generator::generate(&out, &mut collection)?;

    Ok(collection.report)
}

/// Remove the output directory (if any) and create it empty.
fn reset_output_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to remove {}", dir.display()));
        }
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    log!("build"; "output {}", dir.display());
    Ok(())
}
