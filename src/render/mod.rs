//! HTML rendering.
//!
//! - [`markdown`] - markdown body → HTML via `pulldown-cmark`
//! - [`highlight`] - fenced code blocks → inline-styled HTML via `syntect`
//! - [`template`] - page templates via `minijinja`

pub mod highlight;
pub mod markdown;
pub mod template;

pub use markdown::MarkdownRenderer;
pub use template::TemplateSet;
