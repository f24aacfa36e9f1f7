//! stationary: a small static blog generator
//!
//! Markdown posts and pages with YAML front matter are rendered through Tera
//! templates into a static HTML tree, which can be previewed over HTTP.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod server;
pub mod templates;

pub use error::{Error, Result};

use content::Permalinks;
use std::path::{Path, PathBuf};

/// A site on disk together with its configuration
#[derive(Debug, Clone)]
pub struct Stationary {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory (posts/, pages/, static/, templates/)
    pub source_dir: PathBuf,
    /// Output directory
    pub public_dir: PathBuf,
}

impl Stationary {
    pub const CONFIG_FILE: &'static str = "_config.yml";

    /// Open the site in `base_dir`, reading `_config.yml` if there is one
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(Self::CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::from_config(base_dir, config))
    }

    /// Create from an already loaded configuration
    pub fn from_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = resolve(&base_dir, &config.source_dir);
        let public_dir = resolve(&base_dir, &config.public_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        }
    }

    /// Path and URL rules for this site's output
    pub fn permalinks(&self) -> Permalinks {
        Permalinks::from_config(&self.public_dir, &self.config)
    }

    /// Build the static site
    pub fn build(&self) -> anyhow::Result<()> {
        commands::build::run(self)
    }

    /// Remove the output directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}

fn resolve(base_dir: &Path, dir: &str) -> PathBuf {
    if dir.is_empty() || dir == "." {
        base_dir.to_path_buf()
    } else {
        base_dir.join(dir)
    }
}
