//! Slugs derived from source file names

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Component, Path};

lazy_static! {
    static ref DATE_PREFIX_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}-(.+)").unwrap();
}

/// Strip a leading `YYYY-MM-DD-` stamp, if any
pub fn strip_date_prefix(stem: &str) -> &str {
    DATE_PREFIX_RE
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(stem)
}

/// Slug of a post: the file stem without its date stamp
pub fn post_slug(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    strip_date_prefix(&stem).to_string()
}

/// Slug of a page: its path relative to `root`, extension removed,
/// directories kept and joined with `/`.
///
/// `path` must lie below `root`.
pub fn page_slug(path: &Path, root: &Path) -> String {
    debug_assert!(
        path.starts_with(root),
        "page {:?} is not below {:?}",
        path,
        root
    );
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
    let joined = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    strip_date_prefix(&joined).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "is not below")]
    fn test_page_outside_root() {
        page_slug(Path::new("/elsewhere/about.md"), Path::new("/site/pages"));
    }

    #[test]
    fn test_stamped_post_slug() {
        assert_eq!(
            post_slug(Path::new("posts/2012-05-21-example-post.md")),
            "example-post"
        );
    }

    #[test]
    fn test_plain_post_slug() {
        assert_eq!(post_slug(Path::new("posts/example-post.md")), "example-post");
        assert_eq!(post_slug(Path::new("no-extension")), "no-extension");
    }

    #[test]
    fn test_partial_stamp_is_kept() {
        assert_eq!(strip_date_prefix("2012-05-example"), "2012-05-example");
        assert_eq!(strip_date_prefix("2012-05-21"), "2012-05-21");
        assert_eq!(strip_date_prefix("x2012-05-21-post"), "x2012-05-21-post");
    }

    #[test]
    fn test_only_last_extension_is_removed() {
        assert_eq!(post_slug(Path::new("notes.v2.md")), "notes.v2");
    }

    #[test]
    fn test_nested_page_slug() {
        let root = Path::new("site/pages");
        assert_eq!(page_slug(&root.join("about.md"), root), "about");
        assert_eq!(
            page_slug(&root.join("projects").join("stationary.md"), root),
            "projects/stationary"
        );
    }

    #[test]
    fn test_stamped_page_slug() {
        let root = Path::new("pages");
        assert_eq!(
            page_slug(&root.join("2013-01-02-launch.md"), root),
            "launch"
        );
    }
}
