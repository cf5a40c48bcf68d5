//! Review pane: one block per review, similar-word matches highlighted.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::app::state::ReviewEntry;
use crate::core::highlight::{HighlightedText, Segment};

use super::theme::Theme;

pub struct ReviewList<'a> {
    pub reviews: &'a [ReviewEntry],
    pub scroll: u16,
    pub loading: bool,
    pub block: Block<'a>,
}

impl<'a> ReviewList<'a> {
    fn lines(&self) -> Vec<Line<'a>> {
        let mut lines: Vec<Line> = Vec::new();
        for entry in self.reviews {
            lines.extend(styled_lines(&entry.title, Theme::review_title_style()));
            lines.extend(styled_lines(&entry.text, Theme::review_text_style()));
            lines.push(Line::raw(""));
        }
        lines
    }

    /// Largest scroll offset that still fills the pane when drawn in
    /// `area`.  Counts rows after wrapping, at the pane's inner width.
    pub fn max_scroll(&self, area: Rect) -> u16 {
        let inner = self.block.inner(area);
        if inner.width == 0 || self.reviews.is_empty() {
            return 0;
        }
        let rows = Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .line_count(inner.width);
        rows.saturating_sub(inner.height as usize)
            .min(u16::MAX as usize) as u16
    }
}

impl<'a> Widget for ReviewList<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.reviews.is_empty() {
            let message = if self.loading { "Loading reviews…" } else { "No reviews." };
            Paragraph::new(Line::from(Span::styled(message, Theme::dim_style())))
                .block(self.block)
                .render(area, buf);
            return;
        }

        Paragraph::new(self.lines())
            .block(self.block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}

/// Split highlighted text into lines of styled spans.  Matches never span
/// a newline (they are whole words), so splitting per segment is safe.
fn styled_lines(text: &HighlightedText, base: Style) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span> = Vec::new();

    for segment in text.segments() {
        let style = match segment {
            Segment::Plain(_) => base,
            Segment::Match(_) => Theme::highlight_style(),
        };
        let mut parts = segment.text().split('\n');
        if let Some(first) = parts.next() {
            if !first.is_empty() {
                current.push(Span::styled(first, style));
            }
        }
        for part in parts {
            lines.push(Line::from(std::mem::take(&mut current)));
            if !part.is_empty() {
                current.push(Span::styled(part, style));
            }
        }
    }
    lines.push(Line::from(current));
    lines
}
