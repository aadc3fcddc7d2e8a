/// Endpoint used when neither a flag nor the environment names one.
pub const DEFAULT_SEARCH_URL: &str = "http://search.twitter.com/search.json";

/// Environment variable overriding [`DEFAULT_SEARCH_URL`].
pub const SEARCH_URL_ENV: &str = "TWEET_SEARCH_URL";

/// Resolve the search endpoint: explicit override, then `TWEET_SEARCH_URL`, then the default.
///
/// The returned string is not validated here. A malformed endpoint is reported by the
/// fetch that tries to use it, like any other request failure.
pub fn resolve_search_url(explicit: Option<&str>) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }

    if let Ok(url) = std::env::var(SEARCH_URL_ENV) {
        if !url.trim().is_empty() {
            return url;
        }
    }

    DEFAULT_SEARCH_URL.to_string()
}
