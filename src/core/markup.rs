//! HTML rendering of review blocks and word panels.
//!
//! Server text is escaped unless the caller explicitly asks for
//! [`MarkupMode::TrustedHtml`].

use super::highlight::{HighlightedText, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupMode {
    /// Escape all server-supplied text.
    #[default]
    Escaped,
    /// Emit server text verbatim.  Only for servers whose content is
    /// known to be intended as markup.
    TrustedHtml,
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Render text with each highlighted match wrapped in `<mark>`.
pub fn render_highlighted(text: &HighlightedText, mode: MarkupMode) -> String {
    let mut out = String::with_capacity(text.source().len());
    for segment in text.segments() {
        let body = match mode {
            MarkupMode::Escaped => escape_html(segment.text()),
            MarkupMode::TrustedHtml => segment.text().to_string(),
        };
        match segment {
            Segment::Plain(_) => out.push_str(&body),
            Segment::Match(_) => {
                out.push_str("<mark>");
                out.push_str(&body);
                out.push_str("</mark>");
            }
        }
    }
    out
}

/// One review as a `div.review` block.
pub fn render_review_block(
    title: &HighlightedText,
    text: &HighlightedText,
    mode: MarkupMode,
) -> String {
    format!(
        "<div class=\"review\">\n    <div class=\"review-title\">{}</div>\n    <div class=\"review-text\">{}</div>\n</div>",
        render_highlighted(title, mode),
        render_highlighted(text, mode),
    )
}

/// A panel header followed by the comma-joined words.
pub fn render_word_panel<S: AsRef<str>>(header: &str, words: &[S]) -> String {
    let joined = words
        .iter()
        .map(|w| escape_html(w.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("<h3>{}:</h3>{joined}", escape_html(header))
}
