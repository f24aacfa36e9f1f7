//! Initialize a new site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::templates::DEFAULT_TEMPLATES;

const CONFIG: &str = r#"# Stationary configuration

# Site
title: My Blog

# Directory
source_dir: .
public_dir: html

# URL
blog_url: blog/
post_url: ":year/:month/:day/:slug"

# Preview server
port: 8000

# Code highlighting (any syntect default theme)
highlight:
  theme: InspiredGitHub
  fenced: true
"#;

const ABOUT_PAGE: &str = r#"title: About
---

This page lives in `pages/about.md` and is published at `/about/`.
Set `template: other.html` in the front matter to render it with a different template.
"#;

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>My Blog</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <main>
    <h1>My Blog</h1>
    <p><a href="/blog/">Read the blog</a> or <a href="/about/">learn more</a>.</p>
  </main>
</body>
</html>
"#;

const STYLESHEET: &str = r#"body { max-width: 42rem; margin: 2rem auto; font-family: sans-serif; line-height: 1.5; }
.code pre { padding: 0.75rem; overflow-x: auto; }
.post-nav { display: flex; justify-content: space-between; }
"#;

/// Initialize a new site in the given directory. Existing files are left alone.
pub fn init_site(target_dir: &Path) -> Result<()> {
    for dir in ["posts", "pages", "static", "templates"] {
        fs::create_dir_all(target_dir.join(dir))
            .with_context(|| format!("failed to create {:?}", target_dir.join(dir)))?;
    }

    let today = chrono::Local::now().date_naive();
    let sample_post = format!(
        r#"title: Hello World
date: {}
---

Welcome to your new blog. Posts live in `posts/`; a leading `YYYY-MM-DD-` in the
file name is dropped from the URL.

Code can be highlighted with a sourcecode block:

[sourcecode:rust]
fn main() {{
    println!("Hello, world!");
}}
[/sourcecode]

Run `stationary build` to generate the site and `stationary serve` to preview it.
"#,
        today.format("%Y-%m-%d")
    );

    let mut files: Vec<(String, String)> = vec![
        ("_config.yml".to_string(), CONFIG.to_string()),
        (
            format!("posts/{}-hello-world.md", today.format("%Y-%m-%d")),
            sample_post,
        ),
        ("pages/about.md".to_string(), ABOUT_PAGE.to_string()),
        ("static/index.html".to_string(), HOME_PAGE.to_string()),
        ("static/style.css".to_string(), STYLESHEET.to_string()),
    ];
    files.extend(
        DEFAULT_TEMPLATES
            .iter()
            .map(|(name, source)| (format!("templates/{}", name), source.to_string())),
    );

    for (relative, content) in files {
        let path = target_dir.join(&relative);
        if path.exists() {
            tracing::warn!("Keeping existing {:?}", path);
            continue;
        }
        fs::write(&path, content).with_context(|| format!("failed to write {:?}", path))?;
        tracing::debug!("Created: {:?}", path);
    }

    Ok(())
}
