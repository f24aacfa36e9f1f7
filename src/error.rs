//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Why a source file could not be turned into a post or page
#[derive(Error, Debug)]
pub enum MalformedContent {
    #[error("file is not valid UTF-8")]
    NotUtf8(#[source] std::string::FromUtf8Error),

    #[error("no `---` line separating front matter from body")]
    MissingDelimiter,

    #[error("front matter is not valid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("front matter must be a mapping with string keys")]
    NotAMapping,

    #[error("missing required front-matter key `{0}`")]
    MissingKey(&'static str),

    #[error("`{key}` is not a calendar date: {value:?}")]
    InvalidDate { key: &'static str, value: String },
}

/// Failures of the build operation itself
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("output directory {0:?} already exists, clean it before building")]
    OutputExists(PathBuf),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("failed to load templates from {path:?}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("failed to render template {name}")]
    Render {
        name: String,
        #[source]
        source: tera::Error,
    },
}

/// Static asset copy failures
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("static directory not found: {0:?}")]
    MissingStaticDir(PathBuf),

    #[error("failed to copy {from:?} to {to:?}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Crate-level error
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed content in {path:?}")]
    Content {
        path: PathBuf,
        #[source]
        source: MalformedContent,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("not found: {0:?}")]
    NotFound(PathBuf),

    #[error("invalid configuration in {path:?}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the offending file to a content error
    pub fn content(path: impl Into<PathBuf>, source: MalformedContent) -> Self {
        Error::Content {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
