//! HTML pages rendered through the template set.

use anyhow::Result;
use minijinja::context;

use super::Output;
use crate::{
    content::{ContentItem, TagIndex, sort_by_date_desc},
    debug, log,
    utils::path::tag_slug,
};

/// One `post.html` page per item at `<path>/index.html`.
pub fn write_item_pages(out: &Output<'_>, items: &[ContentItem]) -> Result<()> {
    for item in items {
        let rel = format!("{}/index.html", item.path);
        out.render_to("post.html", context! { Site => out.site, Post => item }, &rel)
            .map_err(|e| e.context(format!("while building {}", item.source.display())))?;
        debug!("page"; "{}", rel);
    }
    Ok(())
}

/// `index.html` with posts, newest first.
pub fn write_index(out: &Output<'_>, posts: &[ContentItem]) -> Result<()> {
    out.render_to("index.html", context! { Site => out.site, Posts => posts }, "index.html")
}

/// `notes.html` with notes, newest first.
pub fn write_notes(out: &Output<'_>, notes: &[ContentItem]) -> Result<()> {
    out.render_to("notes.html", context! { Site => out.site, Notes => notes }, "notes.html")
}

/// `tags/<slug>.html` per tag. A failing tag page is logged and skipped, as
/// is a tag with no usable file name.
///
/// Returns the number of failed pages.
pub fn write_tag_pages(out: &Output<'_>, tags: &TagIndex) -> usize {
    let mut failed = 0;
    for (tag, items) in tags.iter() {
        let Some(slug) = tag_slug(tag) else {
            log!("tags"; "skipping `{}`: not usable as a file name", tag);
            failed += 1;
            continue;
        };
        let mut posts = items.to_vec();
        sort_by_date_desc(&mut posts);

        let rel = format!("tags/{slug}.html");
        let ctx = context! { Site => out.site, Tag => tag, Slug => slug, Posts => posts };
        if let Err(e) = out.render_to("tag.html", ctx, &rel) {
            log!("tags"; "skipping {}: {:#}", rel, e);
            failed += 1;
        }
    }
    failed
}

pub fn write_not_found(out: &Output<'_>) -> Result<()> {
    out.render_to("404.html", context! { Site => out.site }, "404.html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{SiteConfig, SitePaths},
        content::item::tests::item,
        generator::Site,
        render::TemplateSet,
    };
    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn templates(dir: &Path) -> TemplateSet {
        let t = dir.join("templates");
        fs::create_dir_all(&t).unwrap();
        fs::write(t.join("post.html"), "{{ Post.title }}|{{ Post.content|safe }}").unwrap();
        fs::write(
            t.join("index.html"),
            "{% for p in Posts %}{{ p.title }} {% endfor %}",
        )
        .unwrap();
        fs::write(t.join("notes.html"), "{{ Notes|length }}").unwrap();
        fs::write(
            t.join("tag.html"),
            "{{ Tag }}:{% for p in Posts %}{{ p.title }},{% endfor %}",
        )
        .unwrap();
        fs::write(t.join("404.html"), "{{ Site.title }} not found").unwrap();
        TemplateSet::load(t).unwrap()
    }

    fn read(root: &Path, rel: &str) -> String {
        fs::read_to_string(root.join("public").join(rel)).unwrap()
    }

    #[test]
    fn test_item_page_written_to_clean_path() {
        let dir = TempDir::new().unwrap();
        let paths = SitePaths::new(dir.path());
        let site = Site::new(SiteConfig::default(), None, Vec::new());
        let templates = templates(dir.path());
        let out = Output { paths: &paths, site: &site, templates: &templates };

        let mut note = item("x", "", &[]);
        note.path = "notes/rust/x".to_string();
        write_item_pages(&out, &[note]).unwrap();

        assert_eq!(read(dir.path(), "notes/rust/x/index.html"), "x|<p>x</p>");
    }

    #[test]
    fn test_index_and_not_found() {
        let dir = TempDir::new().unwrap();
        let paths = SitePaths::new(dir.path());
        let site = Site::new(SiteConfig::default(), None, Vec::new());
        let templates = templates(dir.path());
        let out = Output { paths: &paths, site: &site, templates: &templates };

        write_index(&out, &[item("b", "", &[]), item("a", "", &[])]).unwrap();
        write_not_found(&out).unwrap();
        write_notes(&out, &[item("n", "", &[])]).unwrap();

        assert_eq!(read(dir.path(), "index.html"), "b a ");
        assert_eq!(read(dir.path(), "404.html"), "My Digital Garden not found");
        assert_eq!(read(dir.path(), "notes.html"), "1");
    }

    #[test]
    fn test_tag_pages_only_for_own_tags_sorted() {
        let dir = TempDir::new().unwrap();
        let paths = SitePaths::new(dir.path());
        let site = Site::new(SiteConfig::default(), None, Vec::new());
        let templates = templates(dir.path());
        let out = Output { paths: &paths, site: &site, templates: &templates };

        let mut tags = TagIndex::default();
        tags.add(&item("old", "2023-01-01", &["a", "b"]));
        tags.add(&item("new", "2024-01-01", &["A"]));
        tags.add(&item("other", "2024-01-01", &["c"]));

        assert_eq!(write_tag_pages(&out, &tags), 0);
        assert_eq!(read(dir.path(), "tags/a.html"), "a:new,old,");
        assert_eq!(read(dir.path(), "tags/b.html"), "b:old,");
        assert_eq!(read(dir.path(), "tags/c.html"), "c:other,");
    }

    #[test]
    fn test_failing_tag_page_is_skipped() {
        let dir = TempDir::new().unwrap();
        let paths = SitePaths::new(dir.path());
        let site = Site::new(SiteConfig::default(), None, Vec::new());
        let templates = templates(dir.path());
        let out = Output { paths: &paths, site: &site, templates: &templates };

        // A directory where the tag file should go makes the write fail.
        fs::create_dir_all(dir.path().join("public/tags/bad.html")).unwrap();

        let mut tags = TagIndex::default();
        tags.add(&item("p", "", &["bad", "good"]));

        assert_eq!(write_tag_pages(&out, &tags), 1);
        assert_eq!(read(dir.path(), "tags/good.html"), "good:p,");
    }

    #[test]
    fn test_tag_pages_stay_inside_tags_dir() {
        let dir = TempDir::new().unwrap();
        let paths = SitePaths::new(dir.path());
        let site = Site::new(SiteConfig::default(), None, Vec::new());
        let templates = templates(dir.path());
        let out = Output { paths: &paths, site: &site, templates: &templates };

        write_index(&out, &[item("p", "", &[])]).unwrap();
        let post_template = fs::read_to_string(dir.path().join("templates/post.html")).unwrap();

        let mut tags = TagIndex::default();
        tags.add(&item("p", "", &["../index", "../../templates/post", "..", "ok"]));

        assert_eq!(write_tag_pages(&out, &tags), 1);
        assert_eq!(read(dir.path(), "index.html"), "p ");
        assert_eq!(
            fs::read_to_string(dir.path().join("templates/post.html")).unwrap(),
            post_template
        );
        // `Tag` keeps the original key; the template escapes `/`.
        assert_eq!(read(dir.path(), "tags/..-index.html"), "..&#x2f;index:p,");
        assert!(read(dir.path(), "tags/..-..-templates-post.html").ends_with("post:p,"));
        assert_eq!(read(dir.path(), "tags/ok.html"), "ok:p,");
    }
}
