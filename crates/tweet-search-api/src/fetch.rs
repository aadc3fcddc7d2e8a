use reqwest::blocking::Client;
use std::time::Instant;

use crate::error::SearchError;
use crate::query::SearchQuery;
use crate::response::{extract_results, SearchResponse};

/// Something that can run a search.
///
/// Implementations block; callers are expected to run them off any interactive thread.
pub trait Fetcher: Send + Sync {
    /// Run the search and return the result texts in response order.
    fn fetch(&self, query: &SearchQuery) -> Result<Vec<String>, SearchError>;

    /// Run the search with every failure folded into [`SearchResponse::Error`].
    fn search(&self, query: &SearchQuery) -> SearchResponse {
        let result = self.fetch(query);
        if let Err(e) = &result {
            log::warn!("Search for {:?} failed ({:?}): {}", query.text(), e.kind(), e);
        }
        result.into()
    }
}

/// [`Fetcher`] issuing one blocking HTTP GET per search.
pub struct HttpFetcher {
    base_url: String,
    client: Client,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SearchError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, query: &SearchQuery) -> Result<Vec<String>, SearchError> {
        let url = query.to_url(&self.base_url)?;
        log::debug!("GET {}", url);

        let start = Instant::now();
        // The response owns the connection; it is released when dropped at the
        // end of this scope on every path.
        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        let body = response.text()?;
        log::debug!(
            "{} from {} ({} bytes in {:?})",
            status,
            url,
            body.len(),
            start.elapsed()
        );

        let result = extract_results(&body);
        if status.is_success() {
            return result;
        }

        // A failed request never yields results; only a service error message survives.
        match result {
            Err(e @ SearchError::Api(_)) => Err(e),
            _ => Err(SearchError::Status {
                url: url.to_string(),
                status,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct Fixed(&'static str);

    impl Fetcher for Fixed {
        fn fetch(&self, _query: &SearchQuery) -> Result<Vec<String>, SearchError> {
            extract_results(self.0)
        }
    }

    #[test]
    fn test_search_folds_errors() {
        let query = SearchQuery::from_terms(["x"]);
        assert_eq!(
            Fixed(r#"{"error":"rate limited"}"#).search(&query),
            SearchResponse::Error("rate limited".to_string())
        );
        assert_eq!(
            Fixed(r#"{"results":[{"text":"a"},{"text":"b"}]}"#).search(&query),
            SearchResponse::Results(vec!["a".to_string(), "b".to_string()])
        );
        assert!(Fixed("").search(&query).is_error());
    }

    #[test]
    fn test_malformed_base_url_is_folded() {
        let fetcher = HttpFetcher::new("::not-a-url").unwrap();
        let query = SearchQuery::from_terms(["x"]);
        assert_eq!(
            fetcher.fetch(&query).unwrap_err().kind(),
            ErrorKind::RequestConstruction
        );

        let lines = fetcher.search(&query).into_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("invalid search URL"));
    }
}
