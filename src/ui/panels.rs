//! Header bar, word panels and the search input.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::app::state::WordPanel;
use crate::core::model::Sentiment;
use crate::core::session::SessionState;

use super::theme::Theme;

// ───────────────────────────────────────── header ────────────

/// Sentiment selector plus `Page X of Y` and the next-page control.
pub struct HeaderBar<'a> {
    pub session: &'a SessionState,
    pub next_page_keys: String,
    pub block: Block<'a>,
}

impl<'a> Widget for HeaderBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(" Sentiment: ", Theme::dim_style())];
        for &sentiment in Sentiment::ALL {
            let style = if sentiment == self.session.sentiment() {
                Theme::selected_filter_style()
            } else {
                Theme::filter_style()
            };
            spans.push(Span::styled(format!(" {} ", sentiment.label()), style));
            spans.push(Span::raw(" "));
        }

        spans.push(Span::styled("│ ", Theme::dim_style()));
        spans.push(Span::raw(self.session.page_info()));
        spans.push(Span::raw("  "));

        let next_style = if self.session.has_next_page() {
            Theme::command_input_style()
        } else {
            Theme::disabled_style()
        };
        spans.push(Span::styled(
            format!("Next page [{}]", self.next_page_keys),
            next_style,
        ));

        Paragraph::new(Line::from(spans))
            .block(self.block)
            .render(area, buf);
    }
}

// ───────────────────────────────────────── word panels ───────

/// A side panel listing comma-joined words, or a placeholder when empty.
pub struct WordPanelView<'a> {
    pub panel: Option<&'a WordPanel>,
    pub placeholder: &'a str,
    pub block: Block<'a>,
}

impl<'a> Widget for WordPanelView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match self.panel {
            Some(panel) => Line::raw(panel.joined()),
            None => Line::from(Span::styled(self.placeholder, Theme::dim_style())),
        };
        Paragraph::new(line)
            .block(self.block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

// ───────────────────────────────────────── search input ──────

pub struct SearchInput<'a> {
    pub query: &'a str,
    pub focused: bool,
    pub block: Block<'a>,
}

impl<'a> Widget for SearchInput<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = if self.focused {
            Line::from(vec![
                Span::styled(self.query, Theme::command_input_style()),
                Span::styled("▏", Theme::command_input_style()),
            ])
        } else if self.query.is_empty() {
            Line::from(Span::styled("Find similar words…", Theme::dim_style()))
        } else {
            Line::raw(self.query)
        };

        // Keep the tail of long queries visible.
        let inner_width = area.width.saturating_sub(2) as usize;
        let overflow = self.query.chars().count().saturating_sub(inner_width.saturating_sub(1));
        Paragraph::new(line)
            .block(self.block)
            .scroll((0, overflow.min(u16::MAX as usize) as u16))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn header_shows_page_info_and_disables_next_on_last_page() {
        let session = SessionState::new(Sentiment::Negative);
        let area = Rect::new(0, 0, 90, 1);
        let mut buf = Buffer::empty(area);
        HeaderBar {
            session: &session,
            next_page_keys: "n".into(),
            block: Block::default(),
        }
        .render(area, &mut buf);

        let row = row_text(&buf, 0);
        assert!(row.contains("Page 1 of 0"), "{row}");
        assert!(row.contains("Next page [n]"));

        let next_col = row.find("Next page").map(|i| row[..i].chars().count()).unwrap_or(0);
        assert_eq!(buf[(next_col as u16, 0)].style().fg, Theme::disabled_style().fg);
    }

    #[test]
    fn word_panel_joins_words() {
        let panel = WordPanel::new(vec!["great".into(), "clean".into()]);
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        WordPanelView {
            panel: Some(&panel),
            placeholder: "—",
            block: Block::default(),
        }
        .render(area, &mut buf);
        assert!(row_text(&buf, 0).starts_with("great, clean"));
    }
}
