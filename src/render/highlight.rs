//! Syntax highlighting for fenced code blocks.
//!
//! Output is self-contained (inline styles, fixed theme) with a line number
//! gutter, so no stylesheet is needed:
//!
//! ```text
//! <pre style="..."><code>
//!   <span style="display:flex;"><span style="...">1</span><span>...</span></span>
//! </code></pre>
//! ```

use anyhow::{Result, anyhow};
use std::fmt::Write;
use syntect::{
    easy::HighlightLines,
    highlighting::{Color, Theme, ThemeSet},
    html::{IncludeBackground, styled_line_to_highlighted_html},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

use crate::utils::html::escape;

/// Theme used for every code block.
pub const THEME: &str = "base16-eighties.dark";

const GUTTER_STYLE: &str =
    "white-space:pre;user-select:none;margin-right:0.4em;padding:0 0.4em 0 0.4em;color:#7f7f7f";

pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new() -> Result<Self> {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let theme = ThemeSet::load_defaults()
            .themes
            .remove(THEME)
            .ok_or_else(|| anyhow!("highlight theme `{THEME}` is not bundled"))?;
        Ok(Self { syntaxes, theme })
    }

    /// Highlight `code` as `lang`, falling back to plain text for unknown
    /// languages.
    pub fn highlight(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        let lines = self
            .highlight_lines(code, syntax)
            .unwrap_or_else(|_| LinesWithEndings::from(code).map(|l| escape(l).into_owned()).collect());

        self.wrap(&lines)
    }

    fn highlight_lines(
        &self,
        code: &str,
        syntax: &SyntaxReference,
    ) -> Result<Vec<String>, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        LinesWithEndings::from(code)
            .map(|line| {
                let regions = highlighter.highlight_line(line, &self.syntaxes)?;
                styled_line_to_highlighted_html(&regions, IncludeBackground::No)
            })
            .collect()
    }

    fn wrap(&self, lines: &[String]) -> String {
        let width = lines.len().to_string().len();
        let mut html = String::with_capacity(lines.iter().map(String::len).sum::<usize>() * 2);

        html.push_str("<pre style=\"");
        if let Some(fg) = self.theme.settings.foreground {
            let _ = write!(html, "color:{};", css_color(fg));
        }
        if let Some(bg) = self.theme.settings.background {
            let _ = write!(html, "background-color:{};", css_color(bg));
        }
        html.push_str("\"><code>");

        for (i, line) in lines.iter().enumerate() {
            let _ = write!(
                html,
                "<span style=\"display:flex;\"><span style=\"{GUTTER_STYLE}\">{:>width$}</span><span>{line}</span></span>",
                i + 1
            );
        }

        html.push_str("</code></pre>\n");
        html
    }
}

fn css_color(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_every_line() {
        let hl = Highlighter::new().unwrap();
        let html = hl.highlight("fn main() {\n    println!(\"hi\");\n}\n", "rust");
        assert!(html.starts_with("<pre style=\""));
        assert!(html.contains(">1</span>"));
        assert!(html.contains(">2</span>"));
        assert!(html.contains(">3</span>"));
        assert!(!html.contains(">4</span>"));
    }

    #[test]
    fn test_known_language_is_styled() {
        let hl = Highlighter::new().unwrap();
        let html = hl.highlight("let x = 1;\n", "rust");
        // pre + gutter account for two; the rest are token spans
        assert!(html.matches("color:#").count() > 3);
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let hl = Highlighter::new().unwrap();
        let html = hl.highlight("a < b\n", "no-such-language");
        assert!(html.contains("&lt;"));
        assert!(!html.contains("a < b"));
    }

    #[test]
    fn test_css_color() {
        let c = Color {
            r: 0x2d,
            g: 0x2d,
            b: 0x2d,
            a: 0xff,
        };
        assert_eq!(css_color(c), "#2d2d2d");
    }
}
