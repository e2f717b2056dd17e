//! Markdown to HTML conversion.
//!
//! Rendering is a pure function of the Markdown source. Callers that only
//! need something to display use `render_to_html`, which degrades to an
//! empty string instead of surfacing an error.

use pulldown_cmark::{html, Options, Parser};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write HTML output: {0}")]
    Write(#[from] std::fmt::Error),
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Convert Markdown to an HTML fragment.
pub fn try_render_to_html(markdown: &str) -> Result<String, RenderError> {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::write_html_fmt(&mut output, parser)?;
    Ok(output)
}

/// Convert Markdown to HTML, returning an empty string on failure.
pub fn render_to_html(markdown: &str) -> String {
    match try_render_to_html(markdown) {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Failed to render markdown");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_renders_h1() {
        assert_eq!(render_to_html("# Hello"), "<h1>Hello</h1>\n");
    }

    #[test]
    fn test_plain_text_becomes_paragraph() {
        assert_eq!(render_to_html("World"), "<p>World</p>\n");
    }

    #[test]
    fn test_empty_input_renders_empty() {
        assert_eq!(render_to_html(""), "");
    }

    #[test]
    fn test_extensions_enabled() {
        let html = render_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let html = try_render_to_html("a < b & c").unwrap();
        assert_eq!(html, "<p>a &lt; b &amp; c</p>\n");
    }
}
