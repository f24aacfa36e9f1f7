//! Content module - handles posts, pages, and content processing

mod frontmatter;
pub mod highlight;
pub mod loader;
mod markdown;
mod permalink;
mod post;
pub mod slug;

pub use frontmatter::{split_front_matter, FrontMatter};
pub use highlight::{Highlighter, SyntectHighlighter};
pub use loader::ContentLoader;
pub use markdown::{ContentRenderer, MarkdownEngine, PulldownMarkdown};
pub use permalink::{expand_post_pattern, Permalinks};
pub use post::{Blog, Page, Post};
