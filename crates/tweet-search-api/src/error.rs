use thiserror::Error;

/// The four failure classes a search can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed base URL or query encoding failure
    RequestConstruction,
    /// Connection, DNS, read or HTTP status failure
    Transport,
    /// Body is not JSON or lacks the `results`/`text` shape
    Parse,
    /// The service itself reported `error`
    Api,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed response: {0}")]
    Parse(String),

    /// Message reported by the service, shown verbatim
    #[error("{0}")]
    Api(String),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::InvalidUrl { .. } => ErrorKind::RequestConstruction,
            SearchError::Transport(_) | SearchError::Status { .. } => ErrorKind::Transport,
            SearchError::Parse(_) => ErrorKind::Parse,
            SearchError::Api(_) => ErrorKind::Api,
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        SearchError::Parse(e.to_string())
    }
}
