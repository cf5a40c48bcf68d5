//! Gateway to the review server.
//!
//! The controller only talks to [`ReviewApi`]; [`http::HttpReviewApi`] is
//! the reqwest-backed implementation and tests substitute a mock.

pub mod http;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::model::{ReviewPage, ReviewQuery, Sentiment, TopWord};

pub use http::HttpReviewApi;

/// The server endpoints this client consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Reviews,
    TopWords,
    SimilarWords,
    ExportReviews,
}

impl Endpoint {
    /// Path relative to the server base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Reviews => "reviews",
            Endpoint::TopWords => "top_words",
            Endpoint::SimilarWords => "similar_words",
            Endpoint::ExportReviews => "export_reviews",
        }
    }

    /// Fixed message shown to the user when a request to this endpoint fails.
    pub fn alert_message(self) -> &'static str {
        match self {
            Endpoint::Reviews => "Error loading reviews",
            Endpoint::TopWords => "Error loading top words",
            Endpoint::SimilarWords => "Error searching for similar words",
            Endpoint::ExportReviews => "Error exporting reviews",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// Errors raised by the gateway.
///
/// Transport failures, non-success statuses and undecodable bodies are all
/// the same kind of failure to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint} request failed: {reason}")]
    RequestFailed { endpoint: Endpoint, reason: String },

    #[error("invalid server URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    pub fn failed(endpoint: Endpoint, reason: impl fmt::Display) -> Self {
        Self::RequestFailed {
            endpoint,
            reason: reason.to_string(),
        }
    }

    /// The user-facing alert text for this error.
    pub fn alert_message(&self) -> &'static str {
        match self {
            ApiError::RequestFailed { endpoint, .. } => endpoint.alert_message(),
            ApiError::InvalidBaseUrl { .. } => "Invalid server URL",
        }
    }
}

/// A downloaded export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// File name suggested by the server.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Read-only access to the review server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// `GET /reviews`.
    async fn reviews(&self, query: ReviewQuery) -> Result<ReviewPage, ApiError>;

    /// `GET /top_words`.
    async fn top_words(&self, sentiment: Sentiment) -> Result<Vec<TopWord>, ApiError>;

    /// `GET /similar_words`.
    async fn similar_words(
        &self,
        word: String,
        sentiment: Sentiment,
    ) -> Result<Vec<String>, ApiError>;

    /// `GET /export_reviews`.
    async fn export_reviews(&self, sentiment: Sentiment) -> Result<ExportedFile, ApiError>;
}
