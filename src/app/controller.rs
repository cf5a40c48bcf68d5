//! Review browser behaviour: loading pages, top words, similar words and
//! highlighting.
//!
//! Operations mutate [`AppState`] and queue [`NetRequest`]s; completed
//! requests come back through the `apply_*` functions.  Nothing here does
//! I/O, which keeps every transition testable without a server.

use crate::api::{ApiError, Endpoint};
use crate::core::{
    highlight::HighlightSet,
    model::{ReviewPage, Sentiment, TopWord},
    session::ReviewTicket,
};

use super::net_runtime::{NetRequest, NetUpdate};
use super::state::{AppState, ReviewEntry, WordPanel};

// ───────────────────────────────────────── reviews ───────────

/// Request a page of reviews for the current filter.
///
/// With `reset`, pagination restarts at page 1 and rendered reviews are
/// cleared before the request is issued.  Without it the next page is
/// appended, if there is one and no other page is still loading.
pub fn load_reviews(state: &mut AppState, reset: bool) {
    let ticket = if reset {
        state.reviews.clear();
        state.scroll = 0;
        state.session.begin_reload()
    } else {
        match state.session.begin_next_page() {
            Some(ticket) => ticket,
            None => return,
        }
    };
    tracing::debug!(
        "loading reviews: sentiment={:?} page={} generation={}",
        ticket.sentiment,
        ticket.page,
        ticket.generation
    );
    state.pending_requests.push(NetRequest::Reviews { ticket });
}

/// Switch the sentiment filter and reload from page 1.
pub fn change_sentiment(state: &mut AppState, sentiment: Sentiment) {
    state.session.set_sentiment(sentiment);
    state.top_words = state.top_words_cache.get(&sentiment).cloned();
    load_reviews(state, true);
}

pub fn next_page(state: &mut AppState) {
    load_reviews(state, false);
}

/// Apply a `/reviews` response.
pub fn apply_reviews(
    state: &mut AppState,
    ticket: ReviewTicket,
    result: Result<ReviewPage, ApiError>,
) {
    if !state.session.accepts(&ticket) {
        tracing::debug!(
            "discarding stale reviews response (page {} generation {})",
            ticket.page,
            ticket.generation
        );
        return;
    }

    let page = match result {
        Ok(page) => page,
        Err(err) => {
            tracing::warn!("{err}");
            state.session.complete(&ticket, None);
            state.alert(err.alert_message());
            return;
        }
    };

    state.session.complete(&ticket, Some(page.total_reviews));
    let raw = state.config.raw_text;
    state
        .reviews
        .extend(page.reviews.into_iter().map(|r| ReviewEntry::from_review(r, raw)));

    // Flag flips on issue, not on success: a failed load stays failed.
    if state.session.claim_top_words(ticket.sentiment) {
        load_top_words(state, ticket.sentiment);
    }
}

// ───────────────────────────────────────── top words ─────────

pub fn load_top_words(state: &mut AppState, sentiment: Sentiment) {
    tracing::debug!("loading top words for {sentiment:?}");
    state.pending_requests.push(NetRequest::TopWords { sentiment });
}

/// Apply a `/top_words` response.  Words keep server order.
pub fn apply_top_words(
    state: &mut AppState,
    sentiment: Sentiment,
    result: Result<Vec<TopWord>, ApiError>,
) {
    match result {
        Ok(words) => {
            let panel = WordPanel::new(words.into_iter().map(|w| w.word).collect());
            if sentiment == state.session.sentiment() {
                state.top_words = Some(panel.clone());
            }
            state.top_words_cache.insert(sentiment, panel);
        }
        Err(err) => {
            tracing::warn!("{err}");
            state.alert(err.alert_message());
        }
    }
}

// ───────────────────────────────────────── similar words ─────

/// Search for words similar to the input value.  The value is sent as-is.
pub fn search_similar_words(state: &mut AppState) {
    state.search_generation = state.search_generation.wrapping_add(1);
    let request = NetRequest::SimilarWords {
        generation: state.search_generation,
        word: state.search_query.clone(),
        sentiment: state.session.sentiment(),
    };
    tracing::debug!("searching similar words: {:?}", state.search_query);
    state.pending_requests.push(request);
}

/// Apply a `/similar_words` response, then highlight with the same list.
pub fn apply_similar_words(
    state: &mut AppState,
    generation: u64,
    result: Result<Vec<String>, ApiError>,
) {
    if generation != state.search_generation {
        tracing::debug!("discarding stale similar-words response ({generation})");
        return;
    }
    match result {
        Ok(words) => {
            state.similar_words = Some(WordPanel::new(words.clone()));
            highlight_similar_words(state, &words);
        }
        Err(err) => {
            tracing::warn!("{err}");
            state.alert(err.alert_message());
        }
    }
}

/// Highlight `words` in every rendered review, from the pristine text.
pub fn highlight_similar_words<S: AsRef<str>>(state: &mut AppState, words: &[S]) {
    let set = HighlightSet::new(words);
    for entry in &mut state.reviews {
        entry.highlight(&set);
    }
    let matches: usize = state
        .reviews
        .iter()
        .map(|r| r.title.match_count() + r.text.match_count())
        .sum();
    state.status_message = Some(if set.is_empty() {
        "No similar words to highlight".to_string()
    } else {
        format!("{matches} highlight(s) across {} review(s)", state.reviews.len())
    });
}

// ───────────────────────────────────────── export ────────────

pub fn export_reviews(state: &mut AppState) {
    let sentiment = state.session.sentiment();
    state.status_message = Some(format!("Exporting {} reviews…", sentiment.label()));
    state.pending_requests.push(NetRequest::Export { sentiment });
}

pub fn apply_export(state: &mut AppState, result: anyhow::Result<std::path::PathBuf>) {
    match result {
        Ok(path) => {
            state.status_message = Some(format!("Exported to {}", path.display()));
        }
        Err(err) => {
            tracing::warn!("export failed: {err:#}");
            state.status_message = None;
            state.alert(Endpoint::ExportReviews.alert_message());
        }
    }
}

// ───────────────────────────────────────── routing ───────────

/// Route a finished request to its `apply_*` function.
pub fn apply_update(state: &mut AppState, update: NetUpdate) {
    state.requests_in_flight = state.requests_in_flight.saturating_sub(1);
    match update {
        NetUpdate::Reviews { ticket, result } => apply_reviews(state, ticket, result),
        NetUpdate::TopWords { sentiment, result } => apply_top_words(state, sentiment, result),
        NetUpdate::SimilarWords { generation, result } => {
            apply_similar_words(state, generation, result)
        }
        NetUpdate::Exported { result } => apply_export(state, result),
    }
}
