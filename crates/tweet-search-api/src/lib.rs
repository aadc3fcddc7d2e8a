//! Client for a JSON search endpoint.
//!
//! A [`SearchQuery`] is turned into a single HTTP GET, the body is parsed and the
//! `text` of every result is returned in order. Failures never escape as errors:
//! [`Fetcher::search`] folds them into a [`SearchResponse::Error`] so callers can
//! display them like any other result line.

pub mod config;
pub mod error;
pub mod fetch;
pub mod query;
pub mod response;

pub use config::{resolve_search_url, DEFAULT_SEARCH_URL, SEARCH_URL_ENV};
pub use error::{ErrorKind, SearchError};
pub use fetch::{Fetcher, HttpFetcher};
pub use query::SearchQuery;
pub use response::{extract_results, SearchResponse};
