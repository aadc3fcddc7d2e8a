use url::Url;

use crate::error::SearchError;

/// Name of the query parameter carrying the joined search terms.
const QUERY_PARAM: &str = "q";

/// Ordered search terms, none of them empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    /// Split raw user input on whitespace.
    ///
    /// Returns `None` for empty or whitespace-only input, in which case no search
    /// should be issued.
    pub fn parse(raw: &str) -> Option<Self> {
        let terms: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
        if terms.is_empty() {
            None
        } else {
            Some(Self { terms })
        }
    }

    /// Build a query from already-split terms. Empty terms are dropped; an empty
    /// list is allowed and targets the base endpoint without a `q` parameter.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Terms joined with single spaces, the value sent as `q`.
    pub fn text(&self) -> String {
        self.terms.join(" ")
    }

    /// Build the request URL from `base`, appending `q` when there are terms.
    pub fn to_url(&self, base: &str) -> Result<Url, SearchError> {
        let mut url = Url::parse(base).map_err(|source| SearchError::InvalidUrl {
            url: base.to_string(),
            source,
        })?;

        if !self.terms.is_empty() {
            url.query_pairs_mut().append_pair(QUERY_PARAM, &self.text());
        }

        Ok(url)
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const BASE: &str = "http://search.twitter.com/search.json";

    fn q_param(url: &Url) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == QUERY_PARAM)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_parse_splits_on_any_whitespace() {
        let query = SearchQuery::parse("  rust \t lang\nnews  ").unwrap();
        assert_eq!(query.terms(), ["rust", "lang", "news"]);
        assert!(query.terms().iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_parse_rejects_blank_input() {
        assert_eq!(SearchQuery::parse(""), None);
        assert_eq!(SearchQuery::parse("   \t\n "), None);
    }

    #[test]
    fn test_from_terms_drops_empty_terms() {
        let query = SearchQuery::from_terms(["a", "", "b"]);
        assert_eq!(query.terms(), ["a", "b"]);
        assert_eq!(query.text(), "a b");
    }

    #[test]
    fn test_url_round_trips_joined_terms() {
        let query = SearchQuery::from_terms(["hello", "world"]);
        let url = query.to_url(BASE).unwrap();
        assert_eq!(q_param(&url).as_deref(), Some("hello world"));
        assert_eq!(url.path(), "/search.json");
    }

    #[test]
    fn test_url_escapes_reserved_characters() {
        let query = SearchQuery::from_terms(["#rust", "a&b=c", "50%"]);
        let url = query.to_url(BASE).unwrap();
        let raw = url.query().unwrap();
        assert!(!raw.contains('#'));
        assert!(!raw.contains("a&b"));
        assert_eq!(q_param(&url).as_deref(), Some("#rust a&b=c 50%"));
    }

    #[test]
    fn test_empty_query_uses_base_url_unchanged() {
        let url = SearchQuery::default().to_url(BASE).unwrap();
        assert_eq!(url.as_str(), BASE);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_existing_query_parameters_are_kept() {
        let query = SearchQuery::from_terms(["x"]);
        let url = query.to_url("http://localhost/search.json?lang=en").unwrap();
        assert_eq!(url.query(), Some("lang=en&q=x"));
    }

    #[test]
    fn test_malformed_base_url() {
        let err = SearchQuery::from_terms(["x"]).to_url("not a url").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestConstruction);
    }
}
