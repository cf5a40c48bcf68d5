//! Input handling.  Maps key/mouse events to controller calls.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::config::Action;

use super::controller;
use super::state::{ActiveView, AppState, Focus};

/// Lines moved per scroll step of the mouse wheel.
const WHEEL_STEP: u16 = 3;

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    // An open alert blocks everything until dismissed.
    if state.current_alert().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            state.dismiss_alert();
        }
        return;
    }

    match state.active_view {
        ActiveView::Help => handle_help_key(state, key),
        ActiveView::Browser => match state.focus {
            Focus::SearchInput => handle_search_key(state, key),
            Focus::Reviews => handle_browser_key(state, key),
        },
    }
}

/// Append pasted text to the search input when it has focus.
pub fn handle_paste(state: &mut AppState, text: &str) {
    if state.current_alert().is_none() && state.focus == Focus::SearchInput {
        state
            .search_query
            .extend(text.chars().filter(|c| !c.is_control()));
    }
}

// ── Browser view (configurable bindings) ────────────────────────

fn handle_browser_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Home => {
            state.scroll = 0;
            return;
        }
        KeyCode::PageDown => {
            scroll_by(state, 10);
            return;
        }
        KeyCode::PageUp => {
            scroll_by(state, -10);
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => state.should_quit = true,
        Action::ShowHelp => state.active_view = ActiveView::Help,
        Action::Reload => controller::load_reviews(state, true),
        Action::NextPage => controller::next_page(state),
        Action::NextSentiment => {
            let next = state.session.sentiment().next();
            controller::change_sentiment(state, next);
        }
        Action::PrevSentiment => {
            let prev = state.session.sentiment().prev();
            controller::change_sentiment(state, prev);
        }
        Action::FocusSearch => state.focus = Focus::SearchInput,
        Action::Export => controller::export_reviews(state),
        Action::ScrollUp => scroll_by(state, -1),
        Action::ScrollDown => scroll_by(state, 1),
    }
}

// ── Search input (hardcoded editing keys) ───────────────────────

fn handle_search_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Tab => state.focus = Focus::Reviews,
        KeyCode::Enter => controller::search_similar_words(state),
        KeyCode::Backspace => {
            state.search_query.pop();
        }
        KeyCode::Char('u') if key.modifiers == KeyModifiers::CONTROL => {
            state.search_query.clear();
        }
        KeyCode::Char(ch) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            state.search_query.push(ch);
        }
        _ => {}
    }
}

// ── Help popup ──────────────────────────────────────────────────

fn handle_help_key(state: &mut AppState, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')) {
        state.active_view = ActiveView::Browser;
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.  Only the wheel is used, to scroll reviews.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.current_alert().is_some() || state.active_view != ActiveView::Browser {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => scroll_by(state, WHEEL_STEP as i32),
        MouseEventKind::ScrollUp => scroll_by(state, -(WHEEL_STEP as i32)),
        _ => {}
    }
}

fn scroll_by(state: &mut AppState, delta: i32) {
    let next = (state.scroll as i32 + delta).clamp(0, state.max_scroll as i32);
    state.scroll = next as u16;
}
