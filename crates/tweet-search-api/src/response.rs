use serde_json::Value;

use crate::error::SearchError;

/// Field carrying a service-reported error message
const ERROR_FIELD: &str = "error";
/// Field holding the array of result objects
const RESULTS_FIELD: &str = "results";
/// Field of each result object holding its display text
const TEXT_FIELD: &str = "text";

/// Outcome of one search, exactly one variant per fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResponse {
    Error(String),
    Results(Vec<String>),
}

impl SearchResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, SearchResponse::Error(_))
    }

    /// Lines to display: the results, or the error message as a single line.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            SearchResponse::Error(message) => vec![message],
            SearchResponse::Results(lines) => lines,
        }
    }
}

impl From<Result<Vec<String>, SearchError>> for SearchResponse {
    fn from(result: Result<Vec<String>, SearchError>) -> Self {
        match result {
            Ok(lines) => SearchResponse::Results(lines),
            Err(e) => SearchResponse::Error(e.to_string()),
        }
    }
}

/// Extract the result texts from a response body.
///
/// An `error` field takes precedence and is returned as [`SearchError::Api`].
pub fn extract_results(body: &str) -> Result<Vec<String>, SearchError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Object(object) = value else {
        return Err(SearchError::Parse("expected a JSON object".to_string()));
    };

    if let Some(error) = object.get(ERROR_FIELD) {
        return Err(SearchError::Api(value_text(error)));
    }

    let results = object
        .get(RESULTS_FIELD)
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::Parse(format!("missing {RESULTS_FIELD:?} array")))?;

    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            result
                .as_object()
                .and_then(|r| r.get(TEXT_FIELD))
                .map(value_text)
                .ok_or_else(|| {
                    SearchError::Parse(format!("result {i} has no {TEXT_FIELD:?} field"))
                })
        })
        .collect()
}

/// String values as-is, anything else as its JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_results_in_order() {
        let lines = extract_results(r#"{"results":[{"text":"a"},{"text":"b"}]}"#).unwrap();
        assert_eq!(lines, ["a", "b"]);
    }

    #[test]
    fn test_other_fields_are_ignored() {
        let body = r#"{
            "completed_in": 0.02,
            "results": [
                {"from_user": "ferris", "id": 1, "text": "hello crab"},
                {"text": "second", "iso_language_code": "en"}
            ]
        }"#;
        assert_eq!(extract_results(body).unwrap(), ["hello crab", "second"]);
    }

    #[test]
    fn test_empty_results() {
        assert!(extract_results(r#"{"results":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_error_field_wins() {
        let err = extract_results(r#"{"error":"rate limited","results":[]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_non_string_values_use_json_text() {
        let err = extract_results(r#"{"error":429}"#).unwrap_err();
        assert_eq!(err.to_string(), "429");

        let lines = extract_results(r#"{"results":[{"text":42}]}"#).unwrap();
        assert_eq!(lines, ["42"]);
    }

    #[test]
    fn test_empty_body_is_parse_error() {
        let err = extract_results("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_shape_errors() {
        let err = extract_results("[]").unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"malformed response: expected a JSON object");

        let err = extract_results(r#"{"statuses":[]}"#).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @r#"malformed response: missing "results" array"#);

        let err = extract_results(r#"{"results":{"text":"a"}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = extract_results(r#"{"results":[{"text":"a"},{"user":"b"}]}"#).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @r#"malformed response: result 1 has no "text" field"#);

        let err = extract_results(r#"{"results":["a"]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_folding_into_lines() {
        let ok: SearchResponse = Ok(vec!["a".to_string()]).into();
        assert_eq!(ok.into_lines(), ["a"]);

        let err: SearchResponse = Err(SearchError::Api("nope".to_string())).into();
        assert!(err.is_error());
        assert_eq!(err.into_lines(), ["nope"]);
    }
}
