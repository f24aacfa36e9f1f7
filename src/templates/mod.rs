//! Template rendering
//!
//! Templates are read from the site's `templates/` directory with the Tera
//! engine. A starter set used by `stationary init` is embedded in the binary.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::content::{Blog, Page, Permalinks, Post};
use crate::error::{BuildError, Error, Result};

/// Starter templates written by `stationary init`, as `(name, source)`
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("default/base.html")),
    ("index.html", include_str!("default/index.html")),
    ("post.html", include_str!("default/post.html")),
    ("page.html", include_str!("default/page.html")),
];

/// Renders named templates with a data context
pub trait TemplateEngine {
    /// Render a template with the given context
    fn render(&self, template_name: &str, context: &Context) -> Result<String>;

    /// Check if a template exists
    fn has_template(&self, name: &str) -> bool;
}

/// Tera templates loaded from a directory
pub struct TeraTemplates {
    tera: Tera,
}

impl TeraTemplates {
    /// Load every file below `dir`; names are paths relative to it.
    /// A missing directory gives an engine with no templates.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut files: Vec<(PathBuf, Option<String>)> = Vec::new();

        if dir.is_dir() {
            for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
                let entry = entry.map_err(|e| Error::io(dir, e.into()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let name = entry
                    .path()
                    .strip_prefix(dir)
                    .unwrap_or(entry.path())
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                files.push((entry.into_path(), Some(name)));
            }
        } else {
            tracing::warn!("No templates directory at {:?}", dir);
        }

        let mut tera = Tera::default();
        // Content is already HTML
        tera.autoescape_on(vec![]);
        tera.register_filter("date_format", date_format_filter);
        tera.add_template_files(files)
            .map_err(|source| BuildError::TemplateLoad {
                path: dir.to_path_buf(),
                source,
            })?;

        tracing::debug!("Loaded {} templates from {:?}", tera.get_template_names().count(), dir);
        Ok(Self { tera })
    }
}

impl TemplateEngine for TeraTemplates {
    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        if !self.has_template(template_name) {
            return Err(BuildError::TemplateNotFound(template_name.to_string()).into());
        }
        self.tera.render(template_name, context).map_err(|source| {
            BuildError::Render {
                name: template_name.to_string(),
                source,
            }
            .into()
        })
    }

    fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }
}

/// Tera filter: format a `YYYY-MM-DD` date string
///
/// `format` is a chrono format string; `LL` is kept as a shorthand for
/// "May 30, 2023".
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => return Ok(tera::Value::String(s)),
    };
    let format = if format == "LL" { "%B %d, %Y".to_string() } else { format };

    match chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        Ok(date) => Ok(tera::Value::String(date.format(&format).to_string())),
        // Not a date: return as-is
        Err(_) => Ok(tera::Value::String(s)),
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub blog_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub slug: String,
    pub date: String,
    pub url: String,
    pub content: String,
}

impl PostData {
    pub fn new(post: &Post, links: &Permalinks) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            date: post.date.format("%Y-%m-%d").to_string(),
            url: links.post_url(post),
            content: post.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub slug: String,
    pub url: String,
    pub content: String,
    pub meta: crate::content::FrontMatter,
}

impl PageData {
    pub fn new(page: &Page, links: &Permalinks) -> Self {
        Self {
            slug: page.slug.clone(),
            url: links.page_url(page),
            content: page.content.clone(),
            meta: page.meta.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogData {
    pub title: String,
    pub url: String,
    pub posts: Vec<PostData>,
}

impl BlogData {
    pub fn new(blog: &Blog, links: &Permalinks) -> Self {
        Self {
            title: blog.title.clone(),
            url: links.blog_url(blog),
            posts: blog
                .posts()
                .iter()
                .map(|p| PostData::new(p, links))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

impl NavPost {
    pub fn new(post: &Post, links: &Permalinks) -> Self {
        Self {
            title: post.title.clone(),
            url: links.post_url(post),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn templates(files: &[(&str, &str)]) -> (TempDir, TeraTemplates) {
        let dir = TempDir::new().unwrap();
        for (name, source) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, source).unwrap();
        }
        let engine = TeraTemplates::load(dir.path()).unwrap();
        (dir, engine)
    }

    #[test]
    fn test_render_without_escaping() {
        let (_dir, engine) = templates(&[("page.html", "<main>{{ content }}</main>")]);
        let mut context = Context::new();
        context.insert("content", "<p>Hi & bye</p>");
        assert_eq!(
            engine.render("page.html", &context).unwrap(),
            "<main><p>Hi & bye</p></main>"
        );
    }

    #[test]
    fn test_nested_names_and_inheritance() {
        let (_dir, engine) = templates(&[
            ("base.html", "[{% block body %}{% endblock %}]"),
            ("layouts/wide.html", "{% extends \"base.html\" %}{% block body %}wide{% endblock %}"),
        ]);
        assert!(engine.has_template("layouts/wide.html"));
        assert_eq!(
            engine.render("layouts/wide.html", &Context::new()).unwrap(),
            "[wide]"
        );
    }

    #[test]
    fn test_missing_template() {
        let (_dir, engine) = templates(&[("page.html", "x")]);
        assert!(!engine.has_template("post.html"));
        let err = engine.render("post.html", &Context::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::Build(BuildError::TemplateNotFound(name)) if name == "post.html"
        ));
    }

    #[test]
    fn test_missing_directory_has_no_templates() {
        let dir = TempDir::new().unwrap();
        let engine = TeraTemplates::load(dir.path().join("templates")).unwrap();
        assert!(!engine.has_template("index.html"));
    }

    #[test]
    fn test_broken_template_fails_to_load() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "{% if %}").unwrap();
        assert!(matches!(
            TeraTemplates::load(dir.path()),
            Err(Error::Build(BuildError::TemplateLoad { .. }))
        ));
    }

    #[test]
    fn test_date_format_filter() {
        let (_dir, engine) = templates(&[(
            "d.html",
            "{{ d | date_format(format=\"LL\") }}|{{ d | date_format(format=\"%d/%m/%Y\") }}|{{ d | date_format }}",
        )]);
        let mut context = Context::new();
        context.insert("d", "2012-05-19");
        assert_eq!(
            engine.render("d.html", &context).unwrap(),
            "May 19, 2012|19/05/2012|2012-05-19"
        );
    }

    #[test]
    fn test_default_templates_parse() {
        let (_dir, engine) = templates(DEFAULT_TEMPLATES);
        for (name, _) in DEFAULT_TEMPLATES {
            assert!(engine.has_template(name));
        }
    }
}
