//! Syntax highlighting of code blocks

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{start_highlighted_html_snippet, styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Turns a block of source code into an HTML fragment
pub trait Highlighter: Send + Sync {
    /// Highlight `code` written in `lang`. Unknown languages are rendered as plain text.
    fn highlight(&self, lang: &str, code: &str) -> String;
}

/// Highlighter backed by syntect's bundled syntaxes and themes
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl SyntectHighlighter {
    /// Create a highlighter with the default theme
    pub fn new() -> Self {
        Self::with_theme("InspiredGitHub")
    }

    /// Create with a named syntect theme, falling back to the default one
    pub fn with_theme(theme_name: &str) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                tracing::warn!("Unknown highlight theme {:?}, using InspiredGitHub", theme_name);
                theme_set
                    .themes
                    .remove("InspiredGitHub")
                    .unwrap_or_default()
            }
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    fn find_syntax(&self, lang: &str) -> &SyntaxReference {
        let lang = lang.trim();
        self.syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    fn try_highlight(&self, syntax: &SyntaxReference, code: &str) -> Result<String, syntect::Error> {
        let (opening, background) = start_highlighted_html_snippet(&self.theme);
        let mut html = opening.trim_end().to_string();

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &self.syntax_set)?;
            html.push_str(&styled_line_to_highlighted_html(
                &regions,
                IncludeBackground::IfDifferent(background),
            )?);
        }

        html.push_str("</pre>");
        Ok(html)
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, lang: &str, code: &str) -> String {
        let syntax = self.find_syntax(lang);
        match self.try_highlight(syntax, code) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to highlight {} block: {}", lang, e);
                format!("<pre>{}</pre>", html_escape(code))
            }
        }
    }
}

/// Simple HTML escaping
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
