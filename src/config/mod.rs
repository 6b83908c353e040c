//! Site configuration management for `config.json`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error    # ConfigError
//! ├── paths    # SitePaths (input/output layout)
//! └── mod.rs   # SiteConfig (this file)
//! ```
//!
//! # Fields
//!
//! | Field         | Purpose                                   |
//! |---------------|-------------------------------------------|
//! | `title`       | Site title                                |
//! | `description` | Site description (meta, RSS channel)      |
//! | `base_url`    | Prefix of every generated URL             |
//! | `umami_id`    | Optional analytics website id             |
//! | `umami_url`   | Optional analytics script URL             |

mod error;
mod paths;

pub use error::ConfigError;
pub use paths::{NOTES_INDEX, SitePaths};

use crate::{log, utils::path::with_trailing_slash};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

const DEFAULT_TITLE: &str = "My Digital Garden";
const DEFAULT_DESCRIPTION: &str = "A static site built from markdown.";
const DEFAULT_BASE_URL: &str = "/";

/// Root configuration structure representing config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub umami_id: Option<String>,
    pub umami_url: Option<String>,
    /// Always ends with `/` after loading.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            umami_id: None,
            umami_url: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration for a site.
    ///
    /// A missing config file is not an error: defaults are used and a warning
    /// is logged. Unreadable or unparsable files are fatal.
    pub fn load(paths: &SitePaths) -> Result<Self, ConfigError> {
        let path = paths.config_file();
        let config = match fs::read_to_string(&path) {
            Ok(content) => Self::from_json(&content, &path)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log!("warning"; "{} not found, using default configuration", path.display());
                Self::default()
            }
            Err(err) => return Err(ConfigError::Io(path, err)),
        };
        Ok(config.normalized())
    }

    /// Parse JSON content, warning about any unknown fields.
    fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let (config, ignored) =
            Self::parse_with_ignored(content).map_err(|e| ConfigError::Json(path.into(), e))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse JSON content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), serde_json::Error> {
        let mut ignored = Vec::new();
        let mut deserializer = serde_json::Deserializer::from_str(content);
        let config = serde_ignored::deserialize(&mut deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        deserializer.end()?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} ignored: {}", display_path, fields.join(", "));
    }

    fn normalized(mut self) -> Self {
        self.base_url = with_trailing_slash(&self.base_url);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.base_url, "/");
        assert!(config.umami_id.is_none());
        assert!(!config.title.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "title": "T",
            "description": "D",
            "umami_id": "abc",
            "umami_url": "https://stats.example.com/script.js",
            "base_url": "https://example.com/"
        }"#;
        let (config, ignored) = SiteConfig::parse_with_ignored(json).unwrap();
        assert!(ignored.is_empty());
        assert_eq!(config.title, "T");
        assert_eq!(config.description, "D");
        assert_eq!(config.umami_id.as_deref(), Some("abc"));
        assert_eq!(config.base_url, "https://example.com/");
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let (config, _) = SiteConfig::parse_with_ignored(r#"{"title": "T"}"#).unwrap();
        assert_eq!(config.title, "T");
        assert_eq!(config.base_url, "/");
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_parse_collects_unknown_fields() {
        let json = r#"{"title": "T", "theme": "dark", "author": "me"}"#;
        let (_, ignored) = SiteConfig::parse_with_ignored(json).unwrap();
        assert_eq!(ignored, vec!["theme", "author"]);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(SiteConfig::parse_with_ignored("{ title: ").is_err());
        assert!(SiteConfig::parse_with_ignored(r#"{"title": 3}"#).is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::load(&SitePaths::new(dir.path())).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_load_normalizes_base_url() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"base_url": "https://example.com/garden"}"#,
        )
        .unwrap();
        let config = SiteConfig::load(&SitePaths::new(dir.path())).unwrap();
        assert_eq!(config.base_url, "https://example.com/garden/");
    }

    #[test]
    fn test_load_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), "not json").unwrap();
        let err = SiteConfig::load(&SitePaths::new(dir.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Json(..)));
    }
}
