//! Output paths and public URLs of posts, pages and the blog index

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};

use super::{Blog, Page, Post};
use crate::config::SiteConfig;

lazy_static! {
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r":(year|month|day|i_month|i_day|slug|title)").unwrap();
}

/// Derives on-disk paths and URLs from the site configuration
#[derive(Debug, Clone)]
pub struct Permalinks {
    output_root: PathBuf,
    /// Blog segment without surrounding slashes, may be empty
    blog_segment: String,
    /// Post URL pattern without surrounding slashes
    post_pattern: String,
}

impl Permalinks {
    pub fn new(output_root: impl Into<PathBuf>, blog_url: &str, post_url: &str) -> Self {
        Self {
            output_root: output_root.into(),
            blog_segment: blog_url.trim_matches('/').to_string(),
            post_pattern: post_url.trim_matches('/').to_string(),
        }
    }

    pub fn from_config(output_root: impl Into<PathBuf>, config: &SiteConfig) -> Self {
        Self::new(output_root, &config.blog_url, &config.post_url)
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// The post pattern instantiated for one post
    pub fn post_segment(&self, post: &Post) -> String {
        expand_post_pattern(&self.post_pattern, &post.date, &post.slug)
    }

    /// `/<blog>/<pattern>/`
    pub fn post_url(&self, post: &Post) -> String {
        format!("{}{}/", self.blog_prefix(), self.post_segment(post))
    }

    /// `<output>/<blog>/<pattern>/index.html`
    pub fn post_path(&self, post: &Post) -> PathBuf {
        self.under_blog(&self.post_segment(post)).join("index.html")
    }

    /// `/<slug>/`
    pub fn page_url(&self, page: &Page) -> String {
        format!("/{}/", page.slug)
    }

    /// `<output>/<slug>/index.html`
    pub fn page_path(&self, page: &Page) -> PathBuf {
        join_segments(&self.output_root, &page.slug).join("index.html")
    }

    /// `/<blog>/`, or `/` when the blog lives at the site root
    pub fn blog_url(&self, _blog: &Blog) -> String {
        self.blog_prefix()
    }

    /// `<output>/<blog>/index.html`
    pub fn blog_path(&self, _blog: &Blog) -> PathBuf {
        join_segments(&self.output_root, &self.blog_segment).join("index.html")
    }

    fn blog_prefix(&self) -> String {
        if self.blog_segment.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", self.blog_segment)
        }
    }

    fn under_blog(&self, segment: &str) -> PathBuf {
        join_segments(&join_segments(&self.output_root, &self.blog_segment), segment)
    }
}

/// Join a `/`-separated URL segment onto a filesystem path
fn join_segments(base: &Path, segments: &str) -> PathBuf {
    segments
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |path, s| path.join(s))
}

/// Fill `:year`, `:month`, `:day`, `:i_month`, `:i_day`, `:slug` and `:title`
pub fn expand_post_pattern(pattern: &str, date: &NaiveDate, slug: &str) -> String {
    PLACEHOLDER_RE
        .replace_all(pattern, |caps: &Captures| match &caps[1] {
            "year" => date.format("%Y").to_string(),
            "month" => date.format("%m").to_string(),
            "day" => date.format("%d").to_string(),
            "i_month" => date.format("%-m").to_string(),
            "i_day" => date.format("%-d").to_string(),
            _ => slug.to_string(),
        })
        .into_owned()
}
