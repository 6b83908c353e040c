//! Page templates.
//!
//! Every file directly inside `templates/` is registered under its file name
//! (`post.html`, `index.html`, ...). Templates use Jinja2 syntax via
//! minijinja; auto-escaping follows the template file extension, so rendered
//! markdown must be emitted with `|safe`.
//!
//! Tag pages are written to `tags/<slug>.html`; templates link to them with
//! `{{ tag|tag_slug }}`.

use minijinja::Environment;
use serde::Serialize;
use std::{fs, io, path::PathBuf};
use thiserror::Error;

use crate::utils::path::tag_slug;

/// Templates a build cannot do without.
pub const REQUIRED_TEMPLATES: [&str; 5] =
    ["post.html", "index.html", "notes.html", "tag.html", "404.html"];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("cannot read templates from `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("template `{0}` failed to parse")]
    Syntax(String, #[source] minijinja::Error),

    #[error("required template `{0}` is missing")]
    Missing(&'static str),

    #[error("template `{0}` failed to render")]
    Render(String, #[source] minijinja::Error),
}

/// Loaded template set, rendered by name.
pub struct TemplateSet {
    env: Environment<'static>,
}

impl TemplateSet {
    /// Eagerly load and compile every template in `dir`.
    ///
    /// Load failures (unreadable directory or file, syntax error, missing
    /// required template) are reported here rather than at first render.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let dir = dir.into();
        let entries = fs::read_dir(&dir).map_err(|e| TemplateError::Io(dir.clone(), e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TemplateError::Io(dir.clone(), e))?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !path.is_file() {
                continue;
            }
            files.push((name, path));
        }
        files.sort();

        let mut env = Environment::new();
        env.add_filter("tag_slug", |tag: &str| tag_slug(&tag.to_lowercase()).unwrap_or_default());
        for (name, path) in files {
            let source = fs::read_to_string(&path).map_err(|e| TemplateError::Io(path, e))?;
            env.add_template_owned(name.clone(), source)
                .map_err(|e| TemplateError::Syntax(name, e))?;
        }

        let set = Self { env };
        if let Some(missing) = REQUIRED_TEMPLATES.iter().find(|name| !set.contains(name)) {
            return Err(TemplateError::Missing(missing));
        }
        Ok(set)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Render template `name` with `ctx` as its data.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, TemplateError> {
        self.env
            .get_template(name)
            .and_then(|tmpl| tmpl.render(ctx))
            .map_err(|e| TemplateError::Render(name.to_string(), e))
    }
}
