//! Content collection.
//!
//! Reads `content/` (flat posts) and `notes/` (recursive notes) into rendered
//! [`ContentItem`]s. The notes directory is walked once; the same pass yields
//! the navigation tree, the homepage body, the tag index and the asset list.
//!
//! Files that cannot be read or parsed are skipped and recorded in the
//! [`BuildReport`]; they never reach a page, listing, feed or index.

use anyhow::{Context, Result};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::{
    frontmatter::{Frontmatter, parse_frontmatter, parse_tags},
    item::{ContentItem, ContentKind, SkipReason, Skipped, TagIndex},
    tree::{NotesVisitor, TreeNode, note_url, walk_notes},
};
use crate::{
    config::{NOTES_INDEX, SiteConfig, SitePaths},
    debug, log,
    render::MarkdownRenderer,
    utils::{date::DateTimeUtc, path::clean_url_path},
};

/// Everything read from the source directories.
#[derive(Debug, Default)]
pub struct Collection {
    pub posts: Vec<ContentItem>,
    pub notes: Vec<ContentItem>,
    pub tags: TagIndex,
    pub notes_tree: Vec<TreeNode>,
    /// Rendered root `notes/_index.md`.
    pub home_content: Option<String>,
    /// Note assets, relative to `notes/`.
    pub assets: Vec<PathBuf>,
    pub report: BuildReport,
}

/// Outcome counters of one build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub skipped: Vec<Skipped>,
    pub posts: usize,
    pub notes: usize,
    pub tags: usize,
    pub assets_copied: usize,
    pub assets_failed: usize,
    pub tag_pages_failed: usize,
}

impl BuildReport {
    fn skip(&mut self, path: &Path, reason: SkipReason) {
        log!("skip"; "{}: {}", path.display(), reason);
        self.skipped.push(Skipped {
            path: path.to_path_buf(),
            reason,
        });
    }
}

/// Collect posts and notes for one build.
pub fn collect(
    paths: &SitePaths,
    config: &SiteConfig,
    renderer: &MarkdownRenderer,
) -> Result<Collection> {
    let mut collector = Collector {
        config,
        renderer,
        out: Collection::default(),
    };

    collector.collect_posts(&paths.content_dir())?;
    let tree = walk_notes(&paths.notes_dir(), &config.base_url, &mut collector)?;

    let mut out = collector.out;
    out.notes_tree = tree;
    out.report.posts = out.posts.len();
    out.report.notes = out.notes.len();
    out.report.tags = out.tags.len();
    Ok(out)
}

struct Collector<'a> {
    config: &'a SiteConfig,
    renderer: &'a MarkdownRenderer,
    out: Collection,
}

impl Collector<'_> {
    fn collect_posts(&mut self, dir: &Path) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("collect"; "no posts directory at {}", dir.display());
                return Ok(());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", dir.display()));
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || name == NOTES_INDEX || !name.ends_with(".md") {
                continue;
            }
            let path = entry.path();
            if path.is_file() {
                files.push((name, path));
            }
        }
        files.sort();

        for (name, path) in files {
            let slug = clean_url_path(Path::new(&name));
            let url = format!("{}{slug}", self.config.base_url);
            match self.load(&path, ContentKind::Post, &name, slug.clone(), url, slug) {
                Ok(item) => self.accept(item),
                Err(reason) => self.out.report.skip(&path, reason),
            }
        }
        Ok(())
    }

    /// Read, parse and render one markdown file.
    fn load(
        &self,
        path: &Path,
        kind: ContentKind,
        file_name: &str,
        slug: String,
        url: String,
        out_path: String,
    ) -> Result<ContentItem, SkipReason> {
        let (meta, body) = read_document(path)?;

        let title = meta
            .non_empty("title")
            .map_or_else(|| file_name.to_string(), str::to_string);

        Ok(ContentItem {
            kind,
            title,
            description: meta.get("description").unwrap_or_default().to_string(),
            date: meta.get("date").and_then(DateTimeUtc::parse_ymd),
            tags: meta.get("tags").map(parse_tags).unwrap_or_default(),
            content: self.renderer.render(&body),
            url,
            slug,
            path: out_path,
            source: path.to_path_buf(),
        })
    }

    fn accept(&mut self, item: ContentItem) {
        debug!("collect"; "{} {}", item.kind.as_str(), item.url);
        self.out.tags.add(&item);
        match item.kind {
            ContentKind::Post => self.out.posts.push(item),
            ContentKind::Note => self.out.notes.push(item),
        }
    }
}

impl NotesVisitor for Collector<'_> {
    fn note(&mut self, path: &Path, rel: &Path) -> Option<String> {
        let file_name = rel
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let slug = clean_url_path(Path::new(&file_name));
        let url = note_url(&self.config.base_url, rel);
        let out_path = format!("notes/{}", clean_url_path(rel));

        match self.load(path, ContentKind::Note, &file_name, slug, url, out_path) {
            Ok(item) => {
                let title = item.title.clone();
                self.accept(item);
                Some(title)
            }
            Err(reason) => {
                self.out.report.skip(path, reason);
                None
            }
        }
    }

    fn home(&mut self, path: &Path) {
        match read_document(path) {
            Ok((_, body)) => self.out.home_content = Some(self.renderer.render(&body)),
            Err(reason) => self.out.report.skip(path, reason),
        }
    }

    fn asset(&mut self, _path: &Path, rel: &Path) {
        self.out.assets.push(rel.to_path_buf());
    }
}

/// Read a markdown file into its frontmatter and body.
fn read_document(path: &Path) -> Result<(Frontmatter, String), SkipReason> {
    let bytes = fs::read(path).map_err(SkipReason::Unreadable)?;
    let text = String::from_utf8(bytes).map_err(|_| SkipReason::NotUtf8)?;
    let (meta, body) = parse_frontmatter(&text)?;
    Ok((meta, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: impl AsRef<[u8]>) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn run(root: &Path) -> Collection {
        let paths = SitePaths::new(root);
        let config = SiteConfig::default();
        let renderer = MarkdownRenderer::new().unwrap();
        collect(&paths, &config, &renderer).unwrap()
    }

    #[test]
    fn test_empty_site() {
        let dir = TempDir::new().unwrap();
        let out = run(dir.path());
        assert!(out.posts.is_empty());
        assert!(out.notes.is_empty());
        assert!(out.notes_tree.is_empty());
        assert!(out.home_content.is_none());
    }

    #[test]
    fn test_posts_are_flat_and_mapped() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(
            root,
            "content/hello.md",
            "---\ntitle: Hello\ndescription: First\ndate: 2024-03-01\ntags: [Go, web]\n---\n# Hi",
        );
        write(root, "content/_index.md", "ignored");
        write(root, "content/.draft.md", "ignored");
        write(root, "content/readme.txt", "ignored");
        write(root, "content/nested/deep.md", "ignored");

        let out = run(root);
        assert_eq!(out.posts.len(), 1);
        let post = &out.posts[0];
        assert_eq!(post.kind, ContentKind::Post);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.description, "First");
        assert_eq!(post.date, Some(DateTimeUtc::from_ymd(2024, 3, 1)));
        assert_eq!(post.tags, vec!["Go", "web"]);
        assert_eq!(post.slug, "hello");
        assert_eq!(post.url, "/hello");
        assert_eq!(post.path, "hello");
        assert!(post.content.contains("<h1 id=\"hi\">Hi</h1>"));
        assert_eq!(out.report.posts, 1);
    }

    #[test]
    fn test_notes_are_recursive() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "notes/rust/borrowing.md", "---\ntitle: Borrowing\ntags: rust\n---\ntext");
        write(root, "notes/plain.md", "just text");

        let out = run(root);
        let urls: Vec<_> = out.notes.iter().map(|n| n.url.as_str()).collect();
        assert_eq!(urls, vec!["/notes/plain", "/notes/rust/borrowing"]);

        let plain = &out.notes[0];
        assert_eq!(plain.title, "plain.md");
        assert!(plain.date.is_none());
        assert_eq!(plain.path, "notes/plain");

        let borrowing = &out.notes[1];
        assert_eq!(borrowing.slug, "borrowing");
        assert_eq!(borrowing.path, "notes/rust/borrowing");
        assert!(!borrowing.url.contains(".md"));
        assert_eq!(out.tags.get("rust").unwrap().len(), 1);
    }

    #[test]
    fn test_home_content_from_root_index_only() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "notes/_index.md", "---\ntitle: Home\n---\nWelcome **in**");
        write(root, "notes/sub/_index.md", "not the home");

        let out = run(root);
        assert_eq!(out.home_content.as_deref(), Some("<p>Welcome <strong>in</strong></p>\n"));
        assert!(out.notes.is_empty());
    }

    #[test]
    fn test_assets_are_recorded() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "notes/images/cat.png", [0u8, 1, 2]);
        write(root, "notes/rust/diagram.svg", "<svg/>");

        let out = run(root);
        assert_eq!(
            out.assets,
            vec![PathBuf::from("images/cat.png"), PathBuf::from("rust/diagram.svg")]
        );
    }

    #[test]
    fn test_bad_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "notes/good.md", "---\ntags: [t]\n---\nok");
        write(root, "notes/broken.md", "---\ntitle: open\ntags: [t]\n");
        write(root, "notes/binary.md", [0xffu8, 0xfe, 0x00]);
        write(root, "content/bad.md", "---\nno close");

        let out = run(root);
        assert_eq!(out.notes.len(), 1);
        assert!(out.posts.is_empty());
        assert_eq!(out.tags.get("t").unwrap().len(), 1);

        assert_eq!(out.report.skipped.len(), 3);
        assert!(out.report.skipped.iter().any(|s| {
            s.path.ends_with("binary.md") && matches!(s.reason, SkipReason::NotUtf8)
        }));
        assert!(out.report.skipped.iter().any(|s| {
            s.path.ends_with("broken.md") && matches!(s.reason, SkipReason::Frontmatter(_))
        }));

        // Skipped notes keep their navigation entry, titled by file name.
        let titles: Vec<_> = out
            .notes_tree
            .iter()
            .map(|n| n.title.as_deref().unwrap())
            .collect();
        assert_eq!(titles, vec!["binary.md", "broken.md", "good.md"]);
    }

    #[test]
    fn test_tags_posts_before_notes() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "notes/n.md", "---\ntitle: N\ntags: x\n---\n");
        write(root, "content/p.md", "---\ntitle: P\ntags: X\n---\n");

        let out = run(root);
        let titles: Vec<_> = out.tags.get("x").unwrap().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["P", "N"]);
        assert_eq!(out.report.tags, 1);
    }

    #[test]
    fn test_base_url_prefixes_urls() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "content/p.md", "x");
        write(root, "notes/n.md", "x");

        let paths = SitePaths::new(root);
        let config = SiteConfig {
            base_url: "https://example.com/".to_string(),
            ..SiteConfig::default()
        };
        let renderer = MarkdownRenderer::new().unwrap();
        let out = collect(&paths, &config, &renderer).unwrap();

        assert_eq!(out.posts[0].url, "https://example.com/p");
        assert_eq!(out.notes[0].url, "https://example.com/notes/n");
        assert_eq!(out.notes_tree[0].url, "https://example.com/notes/n");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_posts_are_followed() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "drafts/linked.md", "---\ntitle: Linked\n---\n");
        fs::create_dir_all(root.join("drafts/folder.md")).unwrap();
        fs::create_dir_all(root.join("content")).unwrap();
        symlink(root.join("drafts/linked.md"), root.join("content/linked.md")).unwrap();
        symlink(root.join("drafts/folder.md"), root.join("content/folder.md")).unwrap();

        let out = run(root);
        let titles: Vec<_> = out.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Linked"]);
        assert!(out.report.skipped.is_empty());
    }
}
