//! Pagination and "already loaded" bookkeeping for one browsing session.
//!
//! All transitions go through methods here so the rules stay in one place:
//! a reload always restarts at page 1, the page count is derived from the
//! last `total_reviews`, and each top-words flag only ever flips once.

use super::model::{ReviewQuery, Sentiment};

/// Reviews requested per page.
pub const PAGE_SIZE: u32 = 10;

/// Identifies one in-flight `/reviews` request.
///
/// A response is only applied while its ticket is still the one the
/// session is waiting for; anything else is a stale answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewTicket {
    pub generation: u64,
    pub sentiment: Sentiment,
    pub page: u32,
    pub page_size: u32,
}

impl ReviewTicket {
    pub fn query(&self) -> ReviewQuery {
        ReviewQuery {
            sentiment: self.sentiment,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// One flag per sentiment bucket.  Flags never reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TopWordsFlags {
    unfiltered: bool,
    positive: bool,
    negative: bool,
}

impl TopWordsFlags {
    fn slot(&mut self, sentiment: Sentiment) -> &mut bool {
        match sentiment {
            Sentiment::All => &mut self.unfiltered,
            Sentiment::Positive => &mut self.positive,
            Sentiment::Negative => &mut self.negative,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    current_page: u32,
    page_size: u32,
    total_reviews: u64,
    sentiment: Sentiment,
    top_words: TopWordsFlags,
    /// Bumped on every reload; a next-page request shares its generation.
    generation: u64,
    in_flight: Option<ReviewTicket>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Sentiment::All)
    }
}

impl SessionState {
    pub fn new(sentiment: Sentiment) -> Self {
        Self {
            current_page: 1,
            page_size: PAGE_SIZE,
            total_reviews: 0,
            sentiment,
            top_words: TopWordsFlags::default(),
            generation: 0,
            in_flight: None,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_reviews(&self) -> u64 {
        self.total_reviews
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn set_sentiment(&mut self, sentiment: Sentiment) {
        self.sentiment = sentiment;
    }

    /// `ceil(total_reviews / page_size)`, always derived from the latest total.
    pub fn total_pages(&self) -> u64 {
        self.total_reviews.div_ceil(u64::from(self.page_size.max(1)))
    }

    /// The next-page control is enabled only while this is true.
    pub fn has_next_page(&self) -> bool {
        u64::from(self.current_page) < self.total_pages()
    }

    pub fn page_info(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages())
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Restart at page 1 under a fresh generation.  Any request still in
    /// flight becomes stale.
    pub fn begin_reload(&mut self) -> ReviewTicket {
        self.current_page = 1;
        self.generation = self.generation.wrapping_add(1);
        self.issue()
    }

    /// Advance one page, or `None` when already on the last page or while a
    /// review request is still outstanding.
    pub fn begin_next_page(&mut self) -> Option<ReviewTicket> {
        if self.in_flight.is_some() || !self.has_next_page() {
            return None;
        }
        self.current_page += 1;
        Some(self.issue())
    }

    fn issue(&mut self) -> ReviewTicket {
        let ticket = ReviewTicket {
            generation: self.generation,
            sentiment: self.sentiment,
            page: self.current_page,
            page_size: self.page_size,
        };
        self.in_flight = Some(ticket);
        ticket
    }

    /// Whether a response for `ticket` should be applied.
    pub fn accepts(&self, ticket: &ReviewTicket) -> bool {
        self.in_flight.as_ref() == Some(ticket)
    }

    /// Settle the in-flight request.  Returns `false` (and changes nothing)
    /// for a stale ticket.
    pub fn complete(&mut self, ticket: &ReviewTicket, total_reviews: Option<u64>) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.in_flight = None;
        if let Some(total) = total_reviews {
            self.total_reviews = total;
        }
        true
    }

    /// Flip the bucket's flag.  Returns `true` only for the call that did it.
    pub fn claim_top_words(&mut self, sentiment: Sentiment) -> bool {
        let slot = self.top_words.slot(sentiment);
        if *slot {
            return false;
        }
        *slot = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn session_with_total(total: u64) -> SessionState {
        let mut session = SessionState::default();
        let ticket = session.begin_reload();
        assert!(session.complete(&ticket, Some(total)));
        session
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(100, 10)]
    #[case(101, 11)]
    fn total_pages_is_ceiling(#[case] total: u64, #[case] pages: u64) {
        let session = session_with_total(total);
        assert_eq!(session.total_pages(), pages);
        assert_eq!(session.page_info(), format!("Page 1 of {pages}"));
    }

    #[rstest]
    #[case(0, false)]
    #[case(10, false)]
    #[case(11, true)]
    fn next_page_enabled_only_before_last_page(#[case] total: u64, #[case] enabled: bool) {
        let session = session_with_total(total);
        assert_eq!(session.has_next_page(), enabled);
    }

    #[test]
    fn next_page_stops_at_last_page() {
        let mut session = session_with_total(25);

        let second = session.begin_next_page().expect("page 2 exists");
        assert_eq!(second.page, 2);
        assert!(session.complete(&second, Some(25)));

        let third = session.begin_next_page().expect("page 3 exists");
        assert!(session.complete(&third, Some(25)));

        assert!(!session.has_next_page());
        assert!(session.begin_next_page().is_none());
        assert_eq!(session.current_page(), 3);
    }

    #[test]
    fn next_page_refused_while_request_outstanding() {
        let mut session = session_with_total(50);
        assert!(session.begin_next_page().is_some());
        assert!(session.begin_next_page().is_none());
        assert_eq!(session.current_page(), 2);
    }

    #[test]
    fn reload_resets_page_and_supersedes_in_flight_request() {
        let mut session = session_with_total(50);
        let stale = session.begin_next_page().unwrap();

        session.set_sentiment(Sentiment::Negative);
        let fresh = session.begin_reload();

        assert_eq!(session.current_page(), 1);
        assert_eq!(fresh.sentiment, Sentiment::Negative);
        assert!(!session.accepts(&stale));
        assert!(!session.complete(&stale, Some(999)));
        assert_eq!(session.total_reviews(), 50);
        assert!(session.complete(&fresh, Some(7)));
        assert_eq!(session.total_reviews(), 7);
    }

    #[test]
    fn failed_request_keeps_previous_total() {
        let mut session = session_with_total(30);
        let ticket = session.begin_next_page().unwrap();
        assert!(session.complete(&ticket, None));
        assert_eq!(session.total_reviews(), 30);
        assert!(!session.is_loading());
    }

    #[test]
    fn top_words_flag_flips_once_per_bucket() {
        let mut session = SessionState::default();
        assert!(session.claim_top_words(Sentiment::All));
        assert!(!session.claim_top_words(Sentiment::All));
        assert!(session.claim_top_words(Sentiment::Positive));
        assert!(!session.claim_top_words(Sentiment::Positive));
        assert!(session.claim_top_words(Sentiment::Negative));
    }
}
