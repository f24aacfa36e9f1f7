//! Generator module - builds the output tree from posts, pages and templates

use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;
use walkdir::WalkDir;

use crate::content::{Blog, ContentLoader, Page, Permalinks};
use crate::error::{AssetError, BuildError, Error, Result};
use crate::templates::{BlogData, NavPost, PageData, PostData, SiteData, TemplateEngine};
use crate::Stationary;

pub const INDEX_TEMPLATE: &str = "index.html";
pub const POST_TEMPLATE: &str = "post.html";

/// Counts of what a build produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildSummary {
    pub posts: usize,
    pub pages: usize,
    pub assets: usize,
}

/// Static site generator
pub struct Generator {
    title: String,
    source_dir: PathBuf,
    public_dir: PathBuf,
    links: Permalinks,
    loader: ContentLoader,
    templates: Box<dyn TemplateEngine>,
}

impl Generator {
    /// Create a generator with the site's own templates and renderer
    pub fn new(site: &Stationary) -> Result<Self> {
        let templates = crate::templates::TeraTemplates::load(site.source_dir.join("templates"))?;
        Ok(Self::with_parts(
            site,
            ContentLoader::new(crate::content::ContentRenderer::from_config(
                &site.config.highlight,
            )),
            Box::new(templates),
        ))
    }

    /// Create with a custom loader and template engine
    pub fn with_parts(
        site: &Stationary,
        loader: ContentLoader,
        templates: Box<dyn TemplateEngine>,
    ) -> Self {
        Self {
            title: site.config.title.clone(),
            source_dir: site.source_dir.clone(),
            public_dir: site.public_dir.clone(),
            links: site.permalinks(),
            loader,
            templates,
        }
    }

    /// Generate the entire site into a fresh output directory
    pub fn generate(&self) -> Result<BuildSummary> {
        if self.public_dir.exists() {
            return Err(BuildError::OutputExists(self.public_dir.clone()).into());
        }

        // Everything that can fail before writing is checked first
        let blog = self.loader.blog_from_source(&self.title, &self.source_dir)?;
        let pages = self.loader.pages_from_source(&self.source_dir.join("pages"))?;
        self.check_templates(&pages)?;

        let assets = copy_static(&self.source_dir.join("static"), &self.public_dir)?;

        let site_data = SiteData {
            title: self.title.clone(),
            blog_url: self.links.blog_url(&blog),
        };

        self.generate_page_pages(&pages, &site_data)?;
        self.generate_blog_index(&blog, &site_data)?;
        self.generate_post_pages(&blog, &site_data)?;

        Ok(BuildSummary {
            posts: blog.posts().len(),
            pages: pages.len(),
            assets,
        })
    }

    fn check_templates(&self, pages: &[Page]) -> Result<()> {
        let page_templates = pages.iter().map(|p| p.template());
        let required = [INDEX_TEMPLATE.to_string(), POST_TEMPLATE.to_string()]
            .into_iter()
            .chain(page_templates);

        for name in required {
            if !self.templates.has_template(&name) {
                return Err(BuildError::TemplateNotFound(name).into());
            }
        }
        Ok(())
    }

    /// Create a base context with common variables
    fn create_base_context(&self, site_data: &SiteData) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context
    }

    /// Generate standalone pages
    fn generate_page_pages(&self, pages: &[Page], site_data: &SiteData) -> Result<()> {
        for page in pages {
            let mut context = self.create_base_context(site_data);
            context.insert("page", &PageData::new(page, &self.links));

            let html = self.templates.render(&page.template(), &context)?;
            write_output(&self.links.page_path(page), &html)?;
        }
        Ok(())
    }

    /// Generate the blog index
    fn generate_blog_index(&self, blog: &Blog, site_data: &SiteData) -> Result<()> {
        let mut context = self.create_base_context(site_data);
        context.insert("blog", &BlogData::new(blog, &self.links));

        let html = self.templates.render(INDEX_TEMPLATE, &context)?;
        write_output(&self.links.blog_path(blog), &html)
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, blog: &Blog, site_data: &SiteData) -> Result<()> {
        let blog_data = BlogData::new(blog, &self.links);

        for (i, post) in blog.posts().iter().enumerate() {
            let newer_post = blog.newer(i).map(|p| NavPost::new(p, &self.links));
            let older_post = blog.older(i).map(|p| NavPost::new(p, &self.links));

            let mut context = self.create_base_context(site_data);
            context.insert("blog", &blog_data);
            context.insert("post", &PostData::new(post, &self.links));
            context.insert("newer_post", &newer_post);
            context.insert("older_post", &older_post);

            let html = self.templates.render(POST_TEMPLATE, &context)?;
            write_output(&self.links.post_path(post), &html)?;
        }
        Ok(())
    }
}

/// Write a rendered file, creating parent directories as needed
fn write_output(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, html).map_err(|e| Error::io(path, e))?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}

/// Recursively copy `static_dir` to `public_dir`, which is created.
/// Returns the number of files copied.
pub fn copy_static(static_dir: &Path, public_dir: &Path) -> Result<usize> {
    if !static_dir.is_dir() {
        return Err(AssetError::MissingStaticDir(static_dir.to_path_buf()).into());
    }

    let copy_failed = |from: &Path, to: &Path, source: std::io::Error| AssetError::CopyFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    fs::create_dir_all(public_dir).map_err(|e| copy_failed(static_dir, public_dir, e))?;

    let mut copied = 0;
    for entry in WalkDir::new(static_dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let from = e.path().unwrap_or(static_dir).to_path_buf();
            copy_failed(&from, public_dir, e.into())
        })?;
        let path = entry.path();
        let relative = path.strip_prefix(static_dir).unwrap_or(path);
        let dest = public_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| copy_failed(path, &dest, e))?;
        } else {
            fs::copy(path, &dest).map_err(|e| copy_failed(path, &dest, e))?;
            tracing::debug!("Copied: {:?} -> {:?}", path, dest);
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::error::MalformedContent;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// A minimal site with plain-text templates that are easy to assert on
    fn site() -> (TempDir, Stationary) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "static/index.html", "<h1>home</h1>");
        write(root, "static/css/site.css", "body {}");
        write(
            root,
            "templates/index.html",
            "{{ blog.title }}:{% for p in blog.posts %}[{{ p.url }}]{% endfor %}",
        );
        write(
            root,
            "templates/post.html",
            "{{ blog.title }}/{{ post.title }}/{{ post.date }}/{{ post.content }}\
             |{% if newer_post %}{{ newer_post.url }}{% endif %}|{% if older_post %}{{ older_post.url }}{% endif %}",
        );
        write(root, "templates/page.html", "page:{{ page.url }}:{{ page.content }}");
        write(root, "templates/wide.html", "wide:{{ page.meta.title }}:{{ site.title }}");
        write(
            root,
            "posts/2012-05-21-example-post.md",
            "title: Example Post\ndate: 2012-05-21\n---\nHello.\n",
        );
        write(
            root,
            "posts/older.md",
            "title: Older\ndate: 2012-05-19\n---\nOld news.\n",
        );
        write(root, "pages/about.md", "title: About\n---\nAbout *me*.\n");
        write(
            root,
            "pages/projects/wide.md",
            "title: Wide\ntemplate: wide.html\n---\nWide page\n",
        );

        let config = SiteConfig {
            title: "Blog Title".to_string(),
            ..SiteConfig::default()
        };
        let site = Stationary::from_config(root, config);
        (dir, site)
    }

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap()
    }

    /// Relative path -> contents for every file below `root`
    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(root)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
                (rel, fs::read(e.path()).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_generate_site() {
        let (_dir, site) = site();
        let summary = Generator::new(&site).unwrap().generate().unwrap();
        assert_eq!(
            summary,
            BuildSummary {
                posts: 2,
                pages: 2,
                assets: 2
            }
        );

        let out = &site.public_dir;
        assert_eq!(read(out.join("index.html")), "<h1>home</h1>");
        assert_eq!(read(out.join("css/site.css")), "body {}");
        assert_eq!(
            read(out.join("blog/index.html")),
            "Blog Title:[/blog/2012/05/21/example-post/][/blog/2012/05/19/older/]"
        );
        assert_eq!(
            read(out.join("blog/2012/05/21/example-post/index.html")),
            "Blog Title/Example Post/2012-05-21/<p>Hello.</p>||/blog/2012/05/19/older/"
        );
        assert_eq!(
            read(out.join("blog/2012/05/19/older/index.html")),
            "Blog Title/Older/2012-05-19/<p>Old news.</p>|/blog/2012/05/21/example-post/|"
        );
        assert_eq!(
            read(out.join("about/index.html")),
            "page:/about/:<p>About <em>me</em>.</p>"
        );
        assert_eq!(
            read(out.join("projects/wide/index.html")),
            "wide:Wide:Blog Title"
        );
    }

    #[test]
    fn test_output_must_not_exist() {
        let (_dir, site) = site();
        fs::create_dir_all(site.public_dir.join("stale")).unwrap();

        let err = Generator::new(&site).unwrap().generate().unwrap_err();
        assert!(matches!(err, Error::Build(BuildError::OutputExists(_))));
        assert!(!site.public_dir.join("index.html").exists());
    }

    #[test]
    fn test_malformed_post_writes_nothing() {
        let (_dir, site) = site();
        write(&site.source_dir, "posts/broken.md", "title: Broken\n---\nNo date\n");

        let err = Generator::new(&site).unwrap().generate().unwrap_err();
        assert!(matches!(
            err,
            Error::Content {
                source: MalformedContent::MissingKey("date"),
                ..
            }
        ));
        assert!(!site.public_dir.exists());
    }

    #[test]
    fn test_missing_page_template_writes_nothing() {
        let (_dir, site) = site();
        write(
            &site.source_dir,
            "pages/odd.md",
            "template: nowhere.html\n---\nx\n",
        );

        let err = Generator::new(&site).unwrap().generate().unwrap_err();
        assert!(matches!(
            err,
            Error::Build(BuildError::TemplateNotFound(name)) if name == "nowhere.html"
        ));
        assert!(!site.public_dir.exists());
    }

    #[test]
    fn test_missing_static_dir() {
        let (_dir, site) = site();
        fs::remove_dir_all(site.source_dir.join("static")).unwrap();

        let err = Generator::new(&site).unwrap().generate().unwrap_err();
        assert!(matches!(err, Error::Asset(AssetError::MissingStaticDir(_))));
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let (_dir, site) = site();
        Generator::new(&site).unwrap().generate().unwrap();
        let first = snapshot(&site.public_dir);

        crate::commands::clean::run(&site).unwrap();
        Generator::new(&site).unwrap().generate().unwrap();
        let second = snapshot(&site.public_dir);

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_copy_static_nested() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "static/a/b/c.txt", "c");
        write(dir.path(), "static/top.js", "js");
        let out = dir.path().join("out");

        let copied = copy_static(&dir.path().join("static"), &out).unwrap();
        assert_eq!(copied, 2);
        assert_eq!(read(out.join("a/b/c.txt")), "c");
        assert_eq!(read(out.join("top.js")), "js");
    }
}
