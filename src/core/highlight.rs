//! Whole-word, case-insensitive highlighting of similar words.
//!
//! Highlighting never edits text in place.  Each [`HighlightedText`] keeps
//! the pristine string it was built from and a list of match ranges, so
//! re-applying a (possibly different) word set always starts from the
//! original text and can never match inside previously inserted markers.

use std::ops::Range;

use regex::Regex;

/// A compiled set of words to highlight.
#[derive(Debug, Clone, Default)]
pub struct HighlightSet {
    pattern: Option<Regex>,
}

impl HighlightSet {
    /// Build a matcher for `words`, in order.  Words are matched exactly as
    /// given; only blank ones are dropped.
    ///
    /// All words are folded into a single alternation, so text is scanned
    /// once; where two words match at the same position the earlier one
    /// in `words` wins.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_string())
            .filter(|w| !w.trim().is_empty())
            .collect();
        if words.is_empty() {
            return Self::default();
        }

        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = match Regex::new(&format!(r"(?i)\b(?:{alternation})\b")) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!("highlight pattern rejected ({} words): {err}", words.len());
                None
            }
        };

        Self { pattern }
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// Byte ranges of every match in `text`, in order, non-overlapping.
    pub fn find_ranges(&self, text: &str) -> Vec<Range<usize>> {
        match &self.pattern {
            Some(re) => re.find_iter(text).map(|m| m.range()).collect(),
            None => Vec::new(),
        }
    }
}

/// A run of text, either plain or a highlighted match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Match(&'a str),
}

impl<'a> Segment<'a> {
    pub fn text(self) -> &'a str {
        match self {
            Segment::Plain(s) | Segment::Match(s) => s,
        }
    }
}

/// Text plus the ranges currently highlighted in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightedText {
    source: String,
    matches: Vec<Range<usize>>,
}

impl HighlightedText {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            matches: Vec::new(),
        }
    }

    /// The original, unhighlighted text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Recompute highlights from the pristine source.
    pub fn apply(&mut self, set: &HighlightSet) {
        self.matches = set.find_ranges(&self.source);
    }

    /// Plain and matched runs covering the whole source, in order.
    /// Matched runs keep the casing they have in the source.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut out = Vec::with_capacity(self.matches.len() * 2 + 1);
        let mut cursor = 0;
        for range in &self.matches {
            if range.start > cursor {
                out.push(Segment::Plain(&self.source[cursor..range.start]));
            }
            out.push(Segment::Match(&self.source[range.clone()]));
            cursor = range.end;
        }
        if cursor < self.source.len() || out.is_empty() {
            out.push(Segment::Plain(&self.source[cursor..]));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(text: &HighlightedText) -> Vec<&str> {
        text.segments()
            .into_iter()
            .filter_map(|s| match s {
                Segment::Match(m) => Some(m),
                Segment::Plain(_) => None,
            })
            .collect()
    }

    #[test]
    fn matches_whole_words_only() {
        let set = HighlightSet::new(["cat"]);
        let mut text = HighlightedText::new("the cat sat near the category shelf");
        text.apply(&set);
        assert_eq!(matched(&text), vec!["cat"]);
        assert_eq!(
            text.segments(),
            vec![
                Segment::Plain("the "),
                Segment::Match("cat"),
                Segment::Plain(" sat near the category shelf"),
            ]
        );
    }

    #[test]
    fn match_is_case_insensitive_and_keeps_source_casing() {
        let set = HighlightSet::new(["Cat"]);
        let mut text = HighlightedText::new("cat, CAT and Cat.");
        text.apply(&set);
        assert_eq!(matched(&text), vec!["cat", "CAT", "Cat"]);
    }

    #[test]
    fn reapplying_never_compounds() {
        let set = HighlightSet::new(["span", "class"]);
        let mut text = HighlightedText::new("a span with a class");
        text.apply(&set);
        let first = text.clone();
        text.apply(&set);
        assert_eq!(text, first);
        assert_eq!(text.match_count(), 2);
        assert_eq!(text.source(), "a span with a class");
    }

    #[test]
    fn replacing_the_word_set_drops_old_matches() {
        let mut text = HighlightedText::new("good food, bad service");
        text.apply(&HighlightSet::new(["good"]));
        text.apply(&HighlightSet::new(["bad"]));
        assert_eq!(matched(&text), vec!["bad"]);
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let set = HighlightSet::new(["a.b", "(x"]);
        let mut text = HighlightedText::new("a.b axb (x");
        text.apply(&set);
        assert_eq!(matched(&text), vec!["a.b"]);
    }

    #[test]
    fn earlier_word_wins_at_same_position() {
        let set = HighlightSet::new(["new york", "new"]);
        let mut text = HighlightedText::new("New York is new");
        text.apply(&set);
        assert_eq!(matched(&text), vec!["New York", "new"]);
    }

    #[test]
    fn blank_words_are_ignored() {
        let set = HighlightSet::new(["", "   "]);
        assert!(set.is_empty());
        let mut text = HighlightedText::new("anything");
        text.apply(&set);
        assert_eq!(text.segments(), vec![Segment::Plain("anything")]);
    }

    #[test]
    fn words_are_matched_as_sent() {
        let set = HighlightSet::new([" cat "]);
        let mut text = HighlightedText::new("the cat sat, cat.");
        text.apply(&set);
        assert_eq!(matched(&text), vec![" cat "]);
    }

    #[test]
    fn empty_source_yields_single_empty_segment() {
        let text = HighlightedText::new("");
        assert_eq!(text.segments(), vec![Segment::Plain("")]);
    }
}
