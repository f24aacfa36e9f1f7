//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::Arc;

use super::highlight::{Highlighter, SyntectHighlighter};
use crate::config::HighlightConfig;

lazy_static! {
    static ref SOURCECODE_RE: Regex =
        Regex::new(r"(?s)\[sourcecode:(.+?)\](.+?)\[/sourcecode\]").unwrap();
}

/// Converts Markdown to HTML
pub trait MarkdownEngine: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

/// pulldown-cmark renderer; fenced code blocks with a language are highlighted
pub struct PulldownMarkdown {
    highlighter: Option<Arc<dyn Highlighter>>,
}

impl PulldownMarkdown {
    /// Plain CommonMark rendering, fenced code left to pulldown-cmark
    pub fn new() -> Self {
        Self { highlighter: None }
    }

    /// Highlight fenced code blocks with `highlighter`
    pub fn with_highlighter(highlighter: Arc<dyn Highlighter>) -> Self {
        Self {
            highlighter: Some(highlighter),
        }
    }
}

impl Default for PulldownMarkdown {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownEngine for PulldownMarkdown {
    fn to_html(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let Some(highlighter) = &self.highlighter else {
            let mut html_output = String::new();
            html::push_html(&mut html_output, parser);
            return html_output;
        };

        let mut events: Vec<Event> = Vec::new();
        // Language of the fenced block being collected, if any
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info)))
                    if fence_language(info).is_some() =>
                {
                    code_block_lang = fence_language(info).map(str::to_string);
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) if code_block_lang.is_some() => {
                    let lang = code_block_lang.take().unwrap_or_default();
                    let highlighted = highlighter.highlight(&lang, &code_block_content);
                    events.push(Event::Html(CowStr::from(format!(
                        "<div class=\"code\">{}</div>\n",
                        highlighted
                    ))));
                }
                Event::Text(text) if code_block_lang.is_some() => {
                    code_block_content.push_str(&text);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

/// First word of a fence info string (` ```rust,ignore ` -> `rust`)
fn fence_language(info: &str) -> Option<&str> {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .filter(|lang| !lang.is_empty())
}

/// Turns a post or page body into final HTML
///
/// `[sourcecode:<lang>]...[/sourcecode]` blocks are highlighted first, on the
/// raw text, and the result then goes through the Markdown engine.
pub struct ContentRenderer {
    markdown: Box<dyn MarkdownEngine>,
    highlighter: Arc<dyn Highlighter>,
}

impl ContentRenderer {
    /// Create a renderer with syntect and pulldown-cmark
    pub fn new() -> Self {
        Self::from_config(&HighlightConfig::default())
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        let highlighter: Arc<dyn Highlighter> =
            Arc::new(SyntectHighlighter::with_theme(&config.theme));
        let markdown = if config.fenced {
            PulldownMarkdown::with_highlighter(highlighter.clone())
        } else {
            PulldownMarkdown::new()
        };
        Self::with_engines(Box::new(markdown), highlighter)
    }

    /// Create with custom Markdown and highlighting engines
    pub fn with_engines(markdown: Box<dyn MarkdownEngine>, highlighter: Arc<dyn Highlighter>) -> Self {
        Self {
            markdown,
            highlighter,
        }
    }

    /// Render a body to trimmed HTML
    pub fn render(&self, body: &str) -> String {
        let expanded = self.expand_sourcecode(body);
        self.markdown.to_html(&expanded).trim().to_string()
    }

    /// Replace every sourcecode marker with a highlighted block that the
    /// Markdown pass will leave alone. Text without markers is borrowed as is.
    pub fn expand_sourcecode<'a>(&self, body: &'a str) -> Cow<'a, str> {
        SOURCECODE_RE.replace_all(body, |caps: &Captures| {
            let code = caps[2].trim_matches(|c| c == '\n' || c == '\r');
            let highlighted = self.highlighter.highlight(&caps[1], code);
            // One line, so the surrounding Markdown cannot split the block
            let collapsed = highlighted
                .replace("\n\n", "\n&nbsp;\n")
                .trim()
                .replace('\n', "<br />");
            format!("\n\n<div class=\"code\">{}</div>\n\n", collapsed)
        })
    }
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new()
    }
}
