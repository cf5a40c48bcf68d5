//! Layout helpers to split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout.
///
/// ```text
/// ┌ header: filter + page info ───────────────────┐
/// │ reviews                      │ top words      │
/// │                              ├────────────────┤
/// │                              │ similar words  │
/// ├ search input ────────────────┴────────────────┤
/// status bar
/// ```
pub struct AppLayout {
    pub header_area: Rect,
    pub reviews_area: Rect,
    pub top_words_area: Rect,
    pub similar_words_area: Rect,
    pub search_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // filter selector + page info
                Constraint::Min(5),    // reviews and side panels
                Constraint::Length(3), // search input
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(rows[1]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        Self {
            header_area: rows[0],
            reviews_area: columns[0],
            top_words_area: side[0],
            similar_words_area: side[1],
            search_area: rows[2],
            status_area: rows[3],
        }
    }
}
