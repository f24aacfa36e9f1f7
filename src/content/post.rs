//! Post, Page and Blog models

use chrono::NaiveDate;
use std::path::PathBuf;

use super::FrontMatter;

/// A blog post
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Publication date
    pub date: NaiveDate,

    /// Post title
    pub title: String,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// Rendered HTML content
    pub content: String,

    /// Source file the post was read from
    pub source: PathBuf,
}

/// A standalone page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Path relative to the pages root, without extension
    pub slug: String,

    /// Rendered HTML content
    pub content: String,

    /// All front-matter fields
    pub meta: FrontMatter,
}

impl Page {
    pub const DEFAULT_TEMPLATE: &'static str = "page.html";

    /// Template named by the `template` front-matter key, or `page.html`
    pub fn template(&self) -> String {
        self.meta
            .get_str("template")
            .unwrap_or_else(|| Self::DEFAULT_TEMPLATE.to_string())
    }
}

/// The blog: a title and its posts, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct Blog {
    pub title: String,
    posts: Vec<Post>,
}

impl Blog {
    /// Build a blog, ordering posts by date descending.
    /// Posts sharing a date keep the order they were given in.
    pub fn new(title: impl Into<String>, mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            title: title.into(),
            posts,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// The post published after the one at `index`
    pub fn newer(&self, index: usize) -> Option<&Post> {
        index.checked_sub(1).and_then(|i| self.posts.get(i))
    }

    /// The post published before the one at `index`
    pub fn older(&self, index: usize) -> Option<&Post> {
        self.posts.get(index + 1)
    }
}
