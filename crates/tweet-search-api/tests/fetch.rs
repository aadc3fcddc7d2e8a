use reqwest::blocking::Client;
use tweet_search_api::{ErrorKind, Fetcher, HttpFetcher, SearchQuery, SearchResponse};
use tweet_search_test_utils::{MockServer, Reply};

fn fetcher_for(server: &MockServer) -> HttpFetcher {
    let client = Client::builder().no_proxy().build().unwrap();
    HttpFetcher::with_client(server.url("/search.json"), client)
}

#[test]
fn test_results_are_returned_in_order() {
    let server = MockServer::start(Reply::json(
        r#"{"results":[{"text":"a","id":1},{"text":"b","id":2}]}"#,
    ));
    let fetcher = fetcher_for(&server);

    let response = fetcher.search(&SearchQuery::from_terms(["hello", "world"]));

    assert_eq!(
        response,
        SearchResponse::Results(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(server.requests().len(), 1);
    assert_eq!(server.query_param(0, "q").as_deref(), Some("hello world"));
}

#[test]
fn test_api_error_is_single_line() {
    let server = MockServer::start(Reply::json(r#"{"error":"rate limited"}"#));
    let fetcher = fetcher_for(&server);

    let lines = fetcher
        .search(&SearchQuery::from_terms(["rust"]))
        .into_lines();

    assert_eq!(lines, ["rate limited"]);
}

#[test]
fn test_api_error_wins_over_status() {
    let server = MockServer::start(Reply::status(420, r#"{"error":"You are being rate limited"}"#));
    let fetcher = fetcher_for(&server);

    let err = fetcher
        .fetch(&SearchQuery::from_terms(["rust"]))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.to_string(), "You are being rate limited");
}

#[test]
fn test_status_without_api_error() {
    let server = MockServer::start(Reply::status(503, "<html>down</html>"));
    let fetcher = fetcher_for(&server);

    let err = fetcher
        .fetch(&SearchQuery::from_terms(["rust"]))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().ends_with("returned 503 Service Unavailable"));
}

#[test]
fn test_results_body_on_failed_status_is_ignored() {
    let server = MockServer::start(Reply::status(503, r#"{"results":[{"text":"stale"}]}"#));
    let fetcher = fetcher_for(&server);

    let err = fetcher
        .fetch(&SearchQuery::from_terms(["rust"]))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().ends_with("returned 503 Service Unavailable"));
}

#[test]
fn test_empty_body_is_reported_as_data() {
    let server = MockServer::start(Reply::json(""));
    let fetcher = fetcher_for(&server);

    let response = fetcher.search(&SearchQuery::from_terms(["rust"]));

    assert!(response.is_error());
    let lines = response.into_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("malformed response"));
}

#[test]
fn test_connection_dropped_mid_request() {
    let server = MockServer::start(Reply::hang_up());
    let fetcher = fetcher_for(&server);

    let err = fetcher
        .fetch(&SearchQuery::from_terms(["rust"]))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn test_connection_refused() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = Client::builder().no_proxy().build().unwrap();
    let fetcher = HttpFetcher::with_client(format!("http://127.0.0.1:{port}/search.json"), client);

    let lines = fetcher
        .search(&SearchQuery::from_terms(["rust"]))
        .into_lines();

    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("network error"));
}

#[test]
fn test_empty_query_hits_base_url() {
    let server = MockServer::start(Reply::json(r#"{"results":[]}"#));
    let fetcher = fetcher_for(&server);

    let response = fetcher.search(&SearchQuery::default());

    assert_eq!(response, SearchResponse::Results(Vec::new()));
    assert_eq!(server.requests(), ["/search.json"]);
}
