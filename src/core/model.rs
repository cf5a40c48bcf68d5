//! Wire-level data shapes returned by the review server.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

// ───────────────────────────────────────── sentiment ─────────

/// The sentiment filter.  `All` is sent to the server as an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sentiment {
    #[default]
    All,
    Positive,
    Negative,
}

impl Sentiment {
    /// Selector order, as shown in the header bar.
    pub const ALL: &[Sentiment] = &[Sentiment::All, Sentiment::Positive, Sentiment::Negative];

    /// Value of the `sentiment` query parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            Sentiment::All => "",
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }

    /// Human-readable label for the selector.
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::All => "All",
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
        }
    }

    pub fn next(self) -> Self {
        let idx = self.position();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.position();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a sentiment string is not one of the known filters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sentiment `{0}` (expected all, positive or negative)")]
pub struct UnknownSentiment(pub String);

impl FromStr for Sentiment {
    type Err = UnknownSentiment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(Sentiment::All),
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            _ => Err(UnknownSentiment(s.to_string())),
        }
    }
}

// ───────────────────────────────────────── reviews ───────────

/// A single review.  The server builds these from a dataframe, so either
/// field may come back as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
}

/// One page of `/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub total_reviews: u64,
    /// Echo of the requested page.
    #[serde(default)]
    pub page: Option<u32>,
    /// Echo of the effective page size (the server may shrink the last page).
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Query parameters for `/reviews`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewQuery {
    pub sentiment: Sentiment,
    pub page: u32,
    pub page_size: u32,
}

// ───────────────────────────────────────── top words ─────────

/// A `[word, score]` pair from `/top_words`.  Only `word` is displayed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(String, f64)")]
pub struct TopWord {
    pub word: String,
    pub score: f64,
}

impl From<(String, f64)> for TopWord {
    fn from((word, score): (String, f64)) -> Self {
        Self { word, score }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", Sentiment::All)]
    #[case("all", Sentiment::All)]
    #[case("Positive", Sentiment::Positive)]
    #[case(" negative ", Sentiment::Negative)]
    fn parses_sentiment(#[case] raw: &str, #[case] expected: Sentiment) {
        assert_eq!(raw.parse::<Sentiment>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_sentiment() {
        assert!("neutral".parse::<Sentiment>().is_err());
    }

    #[test]
    fn selector_cycles_in_both_directions() {
        assert_eq!(Sentiment::All.next(), Sentiment::Positive);
        assert_eq!(Sentiment::Negative.next(), Sentiment::All);
        assert_eq!(Sentiment::All.prev(), Sentiment::Negative);
    }

    #[test]
    fn decodes_page_with_null_fields() {
        let page: ReviewPage = serde_json::from_value(serde_json::json!({
            "reviews": [
                { "title": "Great stay", "text": "Loved the cat", "class": 2 },
                { "title": null, "text": "no title" }
            ],
            "total_reviews": 42,
            "page": 1,
            "page_size": 10
        }))
        .unwrap();

        assert_eq!(page.total_reviews, 42);
        assert_eq!(page.reviews[0].title, "Great stay");
        assert_eq!(page.reviews[1].title, "");
        assert_eq!(page.page_size, Some(10));
    }

    #[test]
    fn decodes_top_word_pairs_with_integer_scores() {
        let words: Vec<TopWord> =
            serde_json::from_str(r#"[["The", 120], ["Book", 3.5]]"#).unwrap();
        assert_eq!(words[0].word, "The");
        assert_eq!(words[0].score, 120.0);
        assert_eq!(words[1].word, "Book");
    }
}
