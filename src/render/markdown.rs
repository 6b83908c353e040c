//! Markdown to HTML using pulldown-cmark.
//!
//! The parser's event stream is rewritten before HTML serialization:
//!
//! - headings get a generated `id` (and a copy-link button on h2/h3)
//! - fenced code blocks are replaced by highlighted HTML
//! - soft line breaks become `<br />`
//! - bare `http(s)://` and `www.` URLs and email addresses in text become links
//! - raw HTML from the source is omitted

use anyhow::Result;
use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd,
    TextMergeStream, html::push_html,
};
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

use super::highlight::Highlighter;

/// Extended autolink candidates: a URL with a scheme or `www.` prefix, or an
/// email address. URL candidates are trimmed by [`trim_url_end`].
static AUTOLINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?:https?://|www\.)[^ \t\r\n<>"]+"#,
        r"|[A-Za-z0-9._+-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+",
    ))
    .expect("autolink pattern is valid")
});

/// Replacement for raw HTML found in the source.
const RAW_HTML_OMITTED: &str = "<!-- raw HTML omitted -->";

/// Markdown renderer shared by every page of a build.
pub struct MarkdownRenderer {
    highlighter: Highlighter,
}

impl MarkdownRenderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            highlighter: Highlighter::new()?,
        })
    }

    /// Render a markdown body to an HTML fragment.
    pub fn render(&self, markdown: &str) -> String {
        let parser = TextMergeStream::new(Parser::new_ext(markdown, options()));
        let events = self.rewrite(parser);

        let mut html = String::with_capacity(markdown.len() * 2);
        push_html(&mut html, events.into_iter());
        html
    }

    fn rewrite<'a>(&self, events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
        let mut rw = Rewriter::default();

        for event in events {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    rw.heading = Some(HeadingBuffer::new(level));
                }
                Event::End(TagEnd::Heading(_)) => rw.finish_heading(),

                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    let lang = info.split_whitespace().next().unwrap_or_default();
                    rw.code = Some(CodeBuffer::new(lang));
                }
                Event::Text(text) if rw.code.is_some() => {
                    if let Some(code) = rw.code.as_mut() {
                        code.source.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if rw.code.is_some() => {
                    if let Some(code) = rw.code.take() {
                        let html = self.highlighter.highlight(&code.source, &code.lang);
                        rw.push(Event::Html(html.into()));
                    }
                }

                Event::Start(tag @ Tag::CodeBlock(CodeBlockKind::Indented)) => {
                    rw.in_plain_code = true;
                    rw.push(Event::Start(tag));
                }
                Event::End(TagEnd::CodeBlock) => {
                    rw.in_plain_code = false;
                    rw.push(Event::End(TagEnd::CodeBlock));
                }
                Event::Text(text) if rw.in_plain_code => rw.push(Event::Text(text)),

                Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. })) => {
                    rw.link_depth += 1;
                    rw.push(Event::Start(tag));
                }
                Event::End(end @ (TagEnd::Link | TagEnd::Image)) => {
                    rw.link_depth = rw.link_depth.saturating_sub(1);
                    rw.push(Event::End(end));
                }

                Event::Text(text) => {
                    rw.heading_text(&text);
                    if rw.link_depth == 0 {
                        for e in autolink(text) {
                            rw.push(e);
                        }
                    } else {
                        rw.push(Event::Text(text));
                    }
                }
                Event::Code(code) => {
                    rw.heading_text(&code);
                    rw.push(Event::Code(code));
                }
                Event::SoftBreak | Event::HardBreak => {
                    rw.heading_text(" ");
                    rw.push(Event::HardBreak);
                }

                Event::Start(Tag::HtmlBlock) => {
                    rw.push(Event::Html(format!("{RAW_HTML_OMITTED}\n").into()));
                }
                Event::Html(_) | Event::End(TagEnd::HtmlBlock) => {}
                Event::InlineHtml(_) => rw.push(Event::InlineHtml(RAW_HTML_OMITTED.into())),

                other => rw.push(other),
            }
        }

        rw.out
    }
}

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

#[derive(Default)]
struct Rewriter<'a> {
    out: Vec<Event<'a>>,
    heading: Option<HeadingBuffer<'a>>,
    code: Option<CodeBuffer>,
    in_plain_code: bool,
    link_depth: usize,
    ids: HeadingIds,
}

struct HeadingBuffer<'a> {
    level: HeadingLevel,
    text: String,
    events: Vec<Event<'a>>,
}

impl HeadingBuffer<'_> {
    fn new(level: HeadingLevel) -> Self {
        Self {
            level,
            text: String::new(),
            events: Vec::new(),
        }
    }
}

struct CodeBuffer {
    lang: String,
    source: String,
}

impl CodeBuffer {
    fn new(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            source: String::new(),
        }
    }
}

impl<'a> Rewriter<'a> {
    fn push(&mut self, event: Event<'a>) {
        match self.heading.as_mut() {
            Some(heading) => heading.events.push(event),
            None => self.out.push(event),
        }
    }

    fn heading_text(&mut self, text: &str) {
        if let Some(heading) = self.heading.as_mut() {
            heading.text.push_str(text);
        }
    }

    fn finish_heading(&mut self) {
        let Some(heading) = self.heading.take() else {
            return;
        };
        let level = heading_number(heading.level);
        let id = self.ids.generate(&heading.text);

        let open = if id.is_empty() {
            format!("<h{level}>")
        } else {
            format!("<h{level} id=\"{id}\">")
        };
        self.out.push(Event::Html(open.into()));
        self.out.extend(heading.events);
        if let Some(button) = copy_link_control(level, &id) {
            self.out.push(Event::Html(button.into()));
        }
        self.out.push(Event::Html(format!("</h{level}>\n").into()));
    }
}

fn heading_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// The copy-link button appended inside h2/h3 headings that carry an id.
pub fn copy_link_control(level: u8, id: &str) -> Option<String> {
    if id.is_empty() || !(level == 2 || level == 3) {
        return None;
    }
    Some(format!(
        " <button class=\"copy-link-btn\" aria-label=\"Copy link to this section\" \
         onclick=\"copyToClipboard('#{id}', this)\"><i class=\"fa-solid fa-link\"></i></button>"
    ))
}

/// Heading id generator, unique within one document.
///
/// ASCII letters and digits are kept (lower-cased), whitespace, `-` and `_`
/// become `-`, everything else is dropped. Repeats get `-1`, `-2`, ...
#[derive(Default)]
struct HeadingIds {
    seen: FxHashSet<String>,
}

impl HeadingIds {
    fn generate(&mut self, text: &str) -> String {
        let mut base: String = text
            .trim()
            .chars()
            .filter_map(|c| {
                if c.is_ascii_alphanumeric() {
                    Some(c.to_ascii_lowercase())
                } else if c.is_ascii_whitespace() || c == '-' || c == '_' {
                    Some('-')
                } else {
                    None
                }
            })
            .collect();
        if base.is_empty() {
            base.push_str("heading");
        }

        if self.seen.insert(base.clone()) {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}-{n}");
            if self.seen.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Split a text event around bare URLs and email addresses, wrapping each in
/// a link.
fn autolink(text: CowStr<'_>) -> Vec<Event<'_>> {
    if !AUTOLINK_RE.is_match(&text) {
        return vec![Event::Text(text)];
    }

    let mut events = Vec::new();
    let mut last = 0;
    for m in AUTOLINK_RE.find_iter(&text) {
        let Some((label, link_type, dest)) = link_target(m.as_str()) else {
            continue;
        };
        if m.start() > last {
            events.push(Event::Text(text[last..m.start()].to_string().into()));
        }
        events.push(Event::Start(Tag::Link {
            link_type,
            dest_url: dest.into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        events.push(Event::Text(label.to_string().into()));
        events.push(Event::End(TagEnd::Link));
        last = m.start() + label.len();
    }
    if last < text.len() {
        events.push(Event::Text(text[last..].to_string().into()));
    }
    events
}

/// Link text, link type and destination for an autolink candidate.
///
/// Email destinations stay bare; the HTML writer adds `mailto:`. `None` when
/// a URL is left with nothing after its prefix.
fn link_target(candidate: &str) -> Option<(&str, LinkType, String)> {
    let is_url = ["http://", "https://", "www."].iter().any(|p| candidate.starts_with(p));
    if !is_url {
        return Some((candidate, LinkType::Email, candidate.to_string()));
    }

    let is_www = candidate.starts_with("www.");
    let prefix = if is_www {
        "www.".len()
    } else {
        candidate.find("://").map_or(0, |i| i + 3)
    };
    let url = trim_url_end(candidate);
    if url.len() <= prefix {
        return None;
    }
    let dest = if is_www {
        format!("http://{url}")
    } else {
        url.to_string()
    };
    Some((url, LinkType::Autolink, dest))
}

/// Drop trailing punctuation from a URL, and a closing `)` with no opening
/// partner inside the URL.
fn trim_url_end(mut url: &str) -> &str {
    loop {
        match url.as_bytes().last() {
            Some(b')') if url.matches(')').count() > url.matches('(').count() => {}
            Some(b'.' | b',' | b':' | b';' | b'!' | b'?' | b'\'' | b'*' | b'_' | b'~' | b'(' | b'[' | b']') => {}
            _ => return url,
        }
        url = &url[..url.len() - 1];
    }
}
