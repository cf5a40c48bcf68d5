//! Popup overlay widgets for error alerts and the key-binding help.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::config::{Action, AppConfig};

// ───────────────────────────────────────── alert popup ───────

/// Blocking error notification.  Further alerts wait behind this one.
pub struct AlertPopup<'a> {
    pub message: &'a str,
    /// Alerts still queued behind this one.
    pub queued: usize,
}

impl<'a> Widget for AlertPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (self.message.chars().count() as u16 + 8).clamp(30, 60);
        let popup = centered_fixed(width, 7, area);
        Clear.render(popup, buf);

        let title = if self.queued > 0 {
            format!(" Error (+{} more) ", self.queued)
        } else {
            " Error ".to_string()
        };
        let block = Block::default()
            .title(title)
            .title_style(
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                format!("  {}", self.message),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
            Line::from(Span::styled(
                "  Enter/Esc: dismiss",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

// ───────────────────────────────────────── help popup ────────

/// Read-only list of actions and their configured keys.
pub struct HelpPopup<'a> {
    pub config: &'a AppConfig,
}

impl<'a> Widget for HelpPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // actions + search keys + blanks + hint + border
        let height = (Action::ALL.len() as u16) + 9;
        let popup = centered_fixed(52, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Controls ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let label_style = Style::default().fg(Color::White);
        let key_style = Style::default().fg(Color::Yellow);
        let inner_width = inner.width as usize;

        let row = |label: &str, keys: &str| {
            let label_col = format!("   {label:<22}");
            let keys_width = inner_width.saturating_sub(label_col.len()).max(1);
            Line::from(vec![
                Span::styled(label_col, label_style),
                Span::styled(format!("{keys:>keys_width$}"), key_style),
            ])
        };

        let mut lines = vec![Line::raw("")];
        for &action in Action::ALL {
            lines.push(row(action.label(), &self.config.display_bindings(action)));
        }

        lines.push(Line::raw(""));
        lines.push(row("Search", "Enter"));
        lines.push(row("Leave search", "Esc/Tab"));

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("  Edit bindings in {}", crate::config::config_path().display()),
            dim,
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_clamped() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_fixed(40, 6, area), Rect::new(0, 2, 20, 6));
        assert_eq!(centered_fixed(10, 4, area), Rect::new(5, 3, 10, 4));
    }

    #[test]
    fn alert_shows_message() {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        AlertPopup {
            message: "Error loading reviews",
            queued: 1,
        }
        .render(area, &mut buf);

        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect();
        assert!(text.contains("Error loading reviews"));
        assert!(text.contains("+1 more"));
    }
}
