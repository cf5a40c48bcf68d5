//! Command-line surface: flags for the TUI plus the non-interactive
//! `export`, `print` and `init-config` commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::api::ReviewApi;
use crate::app::net_runtime::save_export;
use crate::config::AppConfig;
use crate::core::{
    highlight::{HighlightSet, HighlightedText},
    markup::{render_review_block, render_word_panel, MarkupMode},
    model::{ReviewQuery, Sentiment},
    session::PAGE_SIZE,
};

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version,
    about = "Browse reviews, top words and similar words from a review server"
)]
pub struct Cli {
    /// Base URL of the review server (overrides the config file).
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Sentiment filter: all, positive or negative.
    #[arg(long, global = true, default_value_t = Sentiment::All)]
    pub sentiment: Sentiment,

    /// Show server text verbatim instead of stripping control characters.
    #[arg(long)]
    pub raw_text: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download the review export for the selected sentiment.
    Export {
        /// Directory to save into (defaults to `export_dir` from the config).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch one page of reviews and print it as HTML.
    Print(PrintArgs),
    /// Write the effective configuration to the config file.
    InitConfig,
}

#[derive(Args, Debug, Clone)]
pub struct PrintArgs {
    /// Page to fetch, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Highlight the words similar to this one.
    #[arg(long)]
    pub similar: Option<String>,

    /// Also print the top-words panel.
    #[arg(long)]
    pub top_words: bool,

    /// Emit server text without HTML escaping.
    #[arg(long)]
    pub trusted_html: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if self.raw_text {
            config.raw_text = true;
        }
        if let Some(Command::Export {
            output: Some(dir), ..
        }) = &self.command
        {
            config.export_dir = dir.clone();
        }
    }
}

/// Download the export for `sentiment` into `dir`.
pub async fn run_export(api: &dyn ReviewApi, sentiment: Sentiment, dir: &Path) -> Result<PathBuf> {
    let file = api.export_reviews(sentiment).await?;
    tracing::debug!("received export {} ({} bytes)", file.file_name, file.bytes.len());
    save_export(dir, file).await
}

/// Fetch one page (and optionally the word panels) and render it as HTML.
pub async fn run_print(api: &dyn ReviewApi, sentiment: Sentiment, args: &PrintArgs) -> Result<String> {
    let mode = if args.trusted_html {
        MarkupMode::TrustedHtml
    } else {
        MarkupMode::Escaped
    };

    let page = api
        .reviews(ReviewQuery {
            sentiment,
            page: args.page.max(1),
            page_size: PAGE_SIZE,
        })
        .await?;

    let mut sections = Vec::new();

    if args.top_words {
        let words: Vec<String> = api
            .top_words(sentiment)
            .await?
            .into_iter()
            .map(|w| w.word)
            .collect();
        sections.push(render_word_panel("Top Words", &words));
    }

    let highlight = match &args.similar {
        Some(word) => {
            let words = api.similar_words(word.clone(), sentiment).await?;
            sections.push(render_word_panel("Similar Words", &words));
            HighlightSet::new(&words)
        }
        None => HighlightSet::default(),
    };

    for review in page.reviews {
        let mut title = HighlightedText::new(review.title);
        let mut text = HighlightedText::new(review.text);
        title.apply(&highlight);
        text.apply(&highlight);
        sections.push(render_review_block(&title, &text, mode));
    }

    Ok(sections.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Endpoint, ExportedFile, MockReviewApi};
    use crate::core::model::{Review, ReviewPage, TopWord};
    use mockall::predicate::eq;

    fn one_review_page() -> ReviewPage {
        ReviewPage {
            reviews: vec![Review {
                title: "Cat <cafe>".into(),
                text: "The cat and the category".into(),
            }],
            total_reviews: 1,
            page: Some(1),
            page_size: Some(PAGE_SIZE),
        }
    }

    fn print_args() -> PrintArgs {
        PrintArgs {
            page: 1,
            similar: None,
            top_words: false,
            trusted_html: false,
        }
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::parse_from([
            "review-browser",
            "--server",
            "http://reviews.local:8080",
            "--raw-text",
            "export",
            "--output",
            "/tmp/out",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.server_url, "http://reviews.local:8080");
        assert!(config.raw_text);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn sentiment_flag_is_global() {
        let cli = Cli::parse_from(["review-browser", "print", "--sentiment", "negative", "--page", "3"]);
        assert_eq!(cli.sentiment, Sentiment::Negative);
        match cli.command {
            Some(Command::Print(args)) => assert_eq!(args.page, 3),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[tokio::test]
    async fn print_highlights_similar_words_and_escapes() {
        let mut api = MockReviewApi::new();
        api.expect_reviews()
            .with(eq(ReviewQuery {
                sentiment: Sentiment::Positive,
                page: 1,
                page_size: PAGE_SIZE,
            }))
            .times(1)
            .returning(|_| Ok(one_review_page()));
        api.expect_similar_words()
            .with(eq("cat".to_string()), eq(Sentiment::Positive))
            .times(1)
            .returning(|_, _| Ok(vec!["cat".into(), "kitten".into()]));
        api.expect_top_words().never();

        let args = PrintArgs {
            similar: Some("cat".into()),
            ..print_args()
        };
        let html = run_print(&api, Sentiment::Positive, &args).await.expect("print");

        assert!(html.starts_with("<h3>Similar Words:</h3>cat, kitten\n"));
        assert!(html.contains("<mark>Cat</mark> &lt;cafe&gt;"));
        assert!(html.contains("The <mark>cat</mark> and the category"));
    }

    #[tokio::test]
    async fn print_includes_top_words_panel() {
        let mut api = MockReviewApi::new();
        api.expect_reviews().returning(|_| Ok(one_review_page()));
        api.expect_top_words()
            .with(eq(Sentiment::All))
            .returning(|_| {
                Ok(vec![
                    TopWord { word: "clean".into(), score: 0.8 },
                    TopWord { word: "quiet".into(), score: 0.5 },
                ])
            });

        let args = PrintArgs {
            top_words: true,
            ..print_args()
        };
        let html = run_print(&api, Sentiment::All, &args).await.expect("print");
        assert!(html.starts_with("<h3>Top Words:</h3>clean, quiet\n<div class=\"review\">"));
    }

    #[tokio::test]
    async fn print_propagates_server_failure() {
        let mut api = MockReviewApi::new();
        api.expect_reviews()
            .returning(|_| Err(ApiError::failed(Endpoint::Reviews, "connection refused")));

        let err = run_print(&api, Sentiment::All, &print_args())
            .await
            .expect_err("should fail");
        assert!(err.to_string().contains("/reviews request failed"));
    }

    #[tokio::test]
    async fn export_writes_into_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut api = MockReviewApi::new();
        api.expect_export_reviews()
            .with(eq(Sentiment::Negative))
            .returning(|_| {
                Ok(ExportedFile {
                    file_name: "negative.xlsx".into(),
                    bytes: b"PK".to_vec(),
                })
            });

        let path = run_export(&api, Sentiment::Negative, dir.path())
            .await
            .expect("export");
        assert_eq!(path, dir.path().join("negative.xlsx"));
        assert_eq!(std::fs::read(&path).expect("read"), b"PK");
    }
}
