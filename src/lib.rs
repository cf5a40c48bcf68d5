//! Terminal client for a review server: paginated reviews per sentiment,
//! lazily loaded top words, and similar-word search with highlighting.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod ui;
