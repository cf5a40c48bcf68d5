//! UI / rendering layer.  Everything that touches Ratatui widgets.
//!
//! This layer takes the application state and turns it into cells on the
//! terminal.  No network I/O happens here.

pub mod layout;
pub mod panels;
pub mod popup;
pub mod review_list;
pub mod spinner;
pub mod theme;

use ratatui::{
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::state::{ActiveView, AppState, Focus};
use crate::config::Action;

use self::{
    layout::AppLayout,
    panels::{HeaderBar, SearchInput, WordPanelView},
    popup::{AlertPopup, HelpPopup},
    review_list::ReviewList,
    spinner::LoadingIndicator,
    theme::Theme,
};

/// Draw one full frame.  Records the review pane's scroll limit, which
/// depends on the terminal width.
pub fn draw(frame: &mut Frame, state: &mut AppState) {
    let layout = AppLayout::from_area(frame.area());

    let bordered = |title: String, focused: bool| {
        Block::default()
            .title(title)
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(if focused {
                Theme::focused_border_style()
            } else {
                Theme::border_style()
            })
    };

    frame.render_widget(
        HeaderBar {
            session: &state.session,
            next_page_keys: state.config.display_bindings(Action::NextPage),
            block: bordered(" Reviews ".to_string(), false),
        },
        layout.header_area,
    );
    frame.render_widget(
        LoadingIndicator {
            visible: state.requests_in_flight > 0,
            tick: state.tick,
        },
        layout.header_area,
    );

    let mut review_list = ReviewList {
        reviews: &state.reviews,
        scroll: 0,
        loading: state.session.is_loading(),
        block: bordered(
            format!(" {} reviews ", state.session.total_reviews()),
            state.focus == Focus::Reviews,
        ),
    };
    state.max_scroll = review_list.max_scroll(layout.reviews_area);
    state.scroll = state.scroll.min(state.max_scroll);
    review_list.scroll = state.scroll;
    frame.render_widget(review_list, layout.reviews_area);

    frame.render_widget(
        WordPanelView {
            panel: state.top_words.as_ref(),
            placeholder: "Not loaded yet.",
            block: bordered(" Top Words: ".to_string(), false),
        },
        layout.top_words_area,
    );
    frame.render_widget(
        WordPanelView {
            panel: state.similar_words.as_ref(),
            placeholder: "Search to find similar words.",
            block: bordered(" Similar Words: ".to_string(), false),
        },
        layout.similar_words_area,
    );

    frame.render_widget(
        SearchInput {
            query: &state.search_query,
            focused: state.focus == Focus::SearchInput,
            block: bordered(
                " Search ".to_string(),
                state.focus == Focus::SearchInput,
            ),
        },
        layout.search_area,
    );

    let hint = state.config.status_bar_hint();
    let status_text = state.status_message.as_deref().unwrap_or(&hint);
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );

    if state.active_view == ActiveView::Help {
        frame.render_widget(HelpPopup { config: &state.config }, frame.area());
    }

    if let Some(message) = state.current_alert() {
        frame.render_widget(
            AlertPopup {
                message,
                queued: state.alerts.len().saturating_sub(1),
            },
            frame.area(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::ReviewEntry;
    use crate::config::AppConfig;
    use crate::core::model::Sentiment;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn draws_panels_and_alert() {
        let mut state = AppState::new(AppConfig::default(), Sentiment::Positive);
        state.alert("Error loading top words");

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal.draw(|f| draw(f, &mut state)).expect("draw");

        let text = screen_text(&terminal);
        assert!(text.contains("Top Words:"));
        assert!(text.contains("Similar Words:"));
        assert!(text.contains("Page 1 of 0"));
        assert!(text.contains("Error loading top words"));
    }

    #[test]
    fn last_review_on_a_page_of_long_reviews_can_be_reached() {
        use crate::app::handler::handle_key;
        use crate::core::model::Review;
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let mut state = AppState::new(AppConfig::default(), Sentiment::All);
        state.reviews = (0..10)
            .map(|i| {
                ReviewEntry::from_review(
                    Review {
                        title: format!("TITLE{i}"),
                        text: "lorem ipsum dolor ".repeat(22),
                    },
                    false,
                )
            })
            .collect();

        let mut terminal = Terminal::new(TestBackend::new(90, 30)).expect("terminal");
        terminal.draw(|f| draw(f, &mut state)).expect("draw");
        assert!(screen_text(&terminal).contains("TITLE0"));

        for _ in 0..1000 {
            handle_key(&mut state, KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }
        terminal.draw(|f| draw(f, &mut state)).expect("draw");

        let text = screen_text(&terminal);
        assert_eq!(state.scroll, state.max_scroll);
        assert!(text.contains("TITLE9"), "{text}");
        assert!(!text.contains("TITLE0"));
    }

    #[test]
    fn out_of_range_scroll_is_clamped_on_draw() {
        use crate::core::model::Review;

        let mut state = AppState::new(AppConfig::default(), Sentiment::All);
        state.reviews = vec![ReviewEntry::from_review(
            Review {
                title: "Only".into(),
                text: "short".into(),
            },
            false,
        )];
        state.scroll = 50;

        let mut terminal = Terminal::new(TestBackend::new(90, 30)).expect("terminal");
        terminal.draw(|f| draw(f, &mut state)).expect("draw");
        assert_eq!(state.max_scroll, 0);
        assert_eq!(state.scroll, 0);
    }
}
