//! Content loader - builds posts, pages and the blog from source files

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{slug, Blog, ContentRenderer, FrontMatter, Page, Post};
use crate::error::{Error, MalformedContent, Result};

/// Loads content from the source directory
pub struct ContentLoader {
    renderer: ContentRenderer,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(renderer: ContentRenderer) -> Self {
        Self { renderer }
    }

    /// Load a single post from a file
    pub fn post_from_source(&self, path: &Path) -> Result<Post> {
        let text = read_source(path)?;
        let (fm, body) = FrontMatter::parse(&text).map_err(|e| Error::content(path, e))?;

        let date = fm.require_date("date").map_err(|e| Error::content(path, e))?;
        let title = fm.require_str("title").map_err(|e| Error::content(path, e))?;

        Ok(Post {
            date,
            title,
            slug: slug::post_slug(path),
            content: self.renderer.render(body),
            source: path.to_path_buf(),
        })
    }

    /// Load a single page from a file below `pages_root`
    pub fn page_from_source(&self, path: &Path, pages_root: &Path) -> Result<Page> {
        let text = read_source(path)?;
        let (meta, body) = FrontMatter::parse(&text).map_err(|e| Error::content(path, e))?;

        Ok(Page {
            slug: slug::page_slug(path, pages_root),
            content: self.renderer.render(body),
            meta,
        })
    }

    /// Load every file in `<content_root>/posts` into a blog.
    /// Any unreadable or malformed post fails the whole blog.
    pub fn blog_from_source(&self, title: &str, content_root: &Path) -> Result<Blog> {
        let posts_dir = content_root.join("posts");
        if !posts_dir.is_dir() {
            tracing::warn!("No posts directory at {:?}", posts_dir);
            return Ok(Blog::new(title, Vec::new()));
        }

        let posts = source_files(&posts_dir, Some(1))?
            .iter()
            .map(|path| self.post_from_source(path))
            .collect::<Result<Vec<_>>>()?;

        Ok(Blog::new(title, posts))
    }

    /// Load every file below `pages_root`, recursively
    pub fn pages_from_source(&self, pages_root: &Path) -> Result<Vec<Page>> {
        if !pages_root.is_dir() {
            tracing::warn!("No pages directory at {:?}", pages_root);
            return Ok(Vec::new());
        }

        source_files(pages_root, None)?
            .iter()
            .map(|path| self.page_from_source(path, pages_root))
            .collect()
    }
}

impl Default for ContentLoader {
    fn default() -> Self {
        Self::new(ContentRenderer::new())
    }
}

/// Read a source file; bytes that are not UTF-8 are a content error
fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    String::from_utf8(bytes).map_err(|e| Error::content(path, MalformedContent::NotUtf8(e)))
}

/// Regular files below `dir` in file-name order, skipping dotfiles
fn source_files(dir: &Path, max_depth: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::io(path, e.into())
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}
