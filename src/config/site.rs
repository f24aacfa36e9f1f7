//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Blog title, exposed to every template
    pub title: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,

    // URL
    /// Segment under which the blog index and posts live (e.g. `blog/`)
    pub blog_url: String,
    /// Post URL pattern, e.g. `:year/:month/:day/:slug`
    pub post_url: String,

    // Preview server
    pub port: u16,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            source_dir: ".".to_string(),
            public_dir: "html".to_string(),
            blog_url: "blog/".to_string(),
            post_url: ":year/:month/:day/:slug".to_string(),
            port: 8000,
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from YAML text. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(SiteConfig::default());
        }
        match serde_yaml::from_str::<Option<SiteConfig>>(content)? {
            Some(config) => Ok(config),
            None => Ok(SiteConfig::default()),
        }
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Name of a syntect default theme
    pub theme: String,
    /// Also highlight fenced Markdown code blocks
    pub fenced: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "InspiredGitHub".to_string(),
            fenced: true,
        }
    }
}
