//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::collections::{HashMap, VecDeque};

use crate::config::AppConfig;
use crate::core::{
    highlight::{HighlightSet, HighlightedText},
    model::{Review, Sentiment},
    sanitize::sanitize_for_terminal,
    session::SessionState,
};

use super::net_runtime::NetRequest;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Browser,
    Help,
}

/// Which part of the browser view receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Reviews,
    SearchInput,
}

/// A rendered review.  Title and text keep their pristine source so
/// highlighting is always recomputed from the original.
#[derive(Debug, Clone)]
pub struct ReviewEntry {
    pub title: HighlightedText,
    pub text: HighlightedText,
}

impl ReviewEntry {
    pub fn from_review(review: Review, raw_text: bool) -> Self {
        let (title, text) = if raw_text {
            (review.title, review.text)
        } else {
            (
                sanitize_for_terminal(&review.title).into_owned(),
                sanitize_for_terminal(&review.text).into_owned(),
            )
        };
        Self {
            title: HighlightedText::new(title),
            text: HighlightedText::new(text),
        }
    }

    pub fn highlight(&mut self, set: &HighlightSet) {
        self.title.apply(set);
        self.text.apply(set);
    }
}

/// Contents of a word panel (top words or similar words).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPanel {
    pub words: Vec<String>,
}

impl WordPanel {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn joined(&self) -> String {
        self.words.join(", ")
    }
}

/// Top-level application state.
pub struct AppState {
    /// Pagination, filter and loaded flags.
    pub session: SessionState,
    /// Reviews currently rendered, in response order.
    pub reviews: Vec<ReviewEntry>,
    /// Top-words panel.  `None` until the first successful load.
    pub top_words: Option<WordPanel>,
    /// Every top-words list received so far, per bucket.
    pub top_words_cache: HashMap<Sentiment, WordPanel>,
    /// Similar-words panel.
    pub similar_words: Option<WordPanel>,
    /// Contents of the word-search input.
    pub search_query: String,
    /// Bumped per search; older results are ignored.
    pub search_generation: u64,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    pub focus: Focus,
    /// Blocking error notifications, oldest first.  While non-empty the
    /// front one is shown and all other input is swallowed.
    pub alerts: VecDeque<String>,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// First visible row of the review pane.
    pub scroll: u16,
    /// Largest useful `scroll`, measured from wrapped rows at the last draw.
    pub max_scroll: u16,
    /// Network work queued by handlers, drained by the event loop.
    pub pending_requests: Vec<NetRequest>,
    /// Requests dispatched but not yet answered.
    pub requests_in_flight: usize,
    /// Drives the loading spinner.
    pub tick: u64,
    /// User configuration (bindings, display options).
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
}

impl AppState {
    pub fn new(config: AppConfig, sentiment: Sentiment) -> Self {
        Self {
            session: SessionState::new(sentiment),
            reviews: Vec::new(),
            top_words: None,
            top_words_cache: HashMap::new(),
            similar_words: None,
            search_query: String::new(),
            search_generation: 0,
            active_view: ActiveView::default(),
            focus: Focus::default(),
            alerts: VecDeque::new(),
            status_message: None,
            scroll: 0,
            max_scroll: 0,
            pending_requests: Vec::new(),
            requests_in_flight: 0,
            tick: 0,
            config,
            should_quit: false,
        }
    }

    /// Queue a blocking user notification.
    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push_back(message.into());
    }

    pub fn current_alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    /// Hand queued network work to the caller.
    pub fn take_pending_requests(&mut self) -> Vec<NetRequest> {
        std::mem::take(&mut self.pending_requests)
    }
}
