//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`route`]: source path → clean URL path (`clean_url_path`, `with_trailing_slash`, `tag_slug`)

pub mod route;

pub use route::{clean_url_path, tag_slug, with_trailing_slash};
