//! reqwest-backed [`ReviewApi`].

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_DISPOSITION};
use serde::de::DeserializeOwned;
use url::Url;

use super::{ApiError, Endpoint, ExportedFile, ReviewApi};
use crate::core::model::{ReviewPage, ReviewQuery, Sentiment, TopWord};

/// File name used when the server does not suggest one.
pub const DEFAULT_EXPORT_NAME: &str = "reviews.xlsx";

pub struct HttpReviewApi {
    client: reqwest::Client,
    base: Url,
    top_words_limit: Option<u32>,
}

impl HttpReviewApi {
    /// Build a client for the server at `base_url`.
    ///
    /// A base URL with a path is treated as a directory, so
    /// `http://host/app` serves `/app/reviews`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url).map_err(|err| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be a base".into(),
            });
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);

        Ok(Self {
            client: reqwest::Client::new(),
            base,
            top_words_limit: None,
        })
    }

    /// Ask `/top_words` for this many words instead of the server default.
    pub fn with_top_words_limit(mut self, limit: Option<u32>) -> Self {
        self.top_words_limit = limit;
        self
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}{}", self.base.path(), endpoint.path());
        url.set_path(&path);
        url
    }

    /// `…/export_reviews?sentiment=<value>`; `All` yields `sentiment=`.
    pub fn export_url(&self, sentiment: Sentiment) -> Url {
        let mut url = self.endpoint_url(Endpoint::ExportReviews);
        url.query_pairs_mut()
            .append_pair("sentiment", sentiment.as_query());
        url
    }

    async fn fetch(
        &self,
        endpoint: Endpoint,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("GET {endpoint} {params:?}");
        self.client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|err| ApiError::failed(endpoint, err))?
            .error_for_status()
            .map_err(|err| ApiError::failed(endpoint, err))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.fetch(endpoint, self.endpoint_url(endpoint), params)
            .await?
            .json::<T>()
            .await
            .map_err(|err| ApiError::failed(endpoint, err))
    }
}

#[async_trait]
impl ReviewApi for HttpReviewApi {
    async fn reviews(&self, query: ReviewQuery) -> Result<ReviewPage, ApiError> {
        let params = [
            ("sentiment", query.sentiment.as_query().to_string()),
            ("page", query.page.to_string()),
            ("page_size", query.page_size.to_string()),
        ];
        self.get_json(Endpoint::Reviews, &params).await
    }

    async fn top_words(&self, sentiment: Sentiment) -> Result<Vec<TopWord>, ApiError> {
        let mut params = vec![("sentiment", sentiment.as_query().to_string())];
        if let Some(limit) = self.top_words_limit {
            params.push(("limit", limit.to_string()));
        }
        self.get_json(Endpoint::TopWords, &params).await
    }

    async fn similar_words(
        &self,
        word: String,
        sentiment: Sentiment,
    ) -> Result<Vec<String>, ApiError> {
        let params = [
            ("word", word),
            ("sentiment", sentiment.as_query().to_string()),
        ];
        self.get_json(Endpoint::SimilarWords, &params).await
    }

    async fn export_reviews(&self, sentiment: Sentiment) -> Result<ExportedFile, ApiError> {
        let endpoint = Endpoint::ExportReviews;
        let response = self.fetch(endpoint, self.export_url(sentiment), &[]).await?;
        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(disposition_file_name)
            .unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_string());
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::failed(endpoint, err))?;
        Ok(ExportedFile {
            file_name,
            bytes: bytes.to_vec(),
        })
    }
}

/// Pull `filename=` out of a `Content-Disposition` header.
fn disposition_file_name(value: &HeaderValue) -> Option<String> {
    let raw = value.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Sentiment::All, "http://localhost:5001/export_reviews?sentiment=")]
    #[case(Sentiment::Positive, "http://localhost:5001/export_reviews?sentiment=positive")]
    #[case(Sentiment::Negative, "http://localhost:5001/export_reviews?sentiment=negative")]
    fn export_url_matches_selected_filter(#[case] sentiment: Sentiment, #[case] expected: &str) {
        let api = HttpReviewApi::new("http://localhost:5001").unwrap();
        assert_eq!(api.export_url(sentiment).as_str(), expected);
    }

    #[test]
    fn base_path_is_kept_as_directory() {
        let api = HttpReviewApi::new("http://example.com/app?x=1").unwrap();
        assert_eq!(
            api.endpoint_url(Endpoint::TopWords).as_str(),
            "http://example.com/app/top_words"
        );
    }

    #[test]
    fn rejects_unparseable_base() {
        let err = HttpReviewApi::new("not a url").err().expect("should fail");
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    #[case("attachment; filename=reviews.xlsx", Some("reviews.xlsx"))]
    #[case("attachment; filename=\"positive.xlsx\"", Some("positive.xlsx"))]
    #[case("inline", None)]
    fn reads_disposition_file_name(#[case] header: &str, #[case] expected: Option<&str>) {
        let value = HeaderValue::from_str(header).unwrap();
        assert_eq!(disposition_file_name(&value).as_deref(), expected);
    }
}
