//! Building canned GraphQL response bodies.

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Value, json};

use crate::graphql::{GraphQLError, GraphQLResponse};

/// `code` extension attached to every synthesized mock error.
pub const VALIDATION_FAILED: &str = "validation-failed";

/// Encode `data` and an optional error into a `{data, errors}` envelope.
///
/// `data` is left out when it serializes to `null`; `errors` holds exactly
/// `error` when one is given.
///
/// # Panics
///
/// Panics if `data` cannot be serialized. Mock data comes from test setup,
/// so a failure here is a bug in the test.
pub fn encode_mock_response<T: Serialize + ?Sized>(
    data: &T,
    error: Option<&GraphQLError>,
) -> String {
    let data = match serde_json::to_value(data) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => panic!("mock response data is not serializable: {e}"),
    };
    let response = GraphQLResponse {
        data,
        errors: error.into_iter().cloned().collect(),
        extensions: None,
    };
    match serde_json::to_string(&response) {
        Ok(body) => body,
        Err(e) => panic!("mock response is not serializable: {e}"),
    }
}

/// The body of a mutation that reports `affected_rows`.
pub fn affected_rows_response(mutation_name: &str, affected_rows: i64) -> String {
    encode_mock_response(
        &json!({ mutation_name: { "affected_rows": affected_rows } }),
        None,
    )
}

/// A 400 response carrying a `validation-failed` GraphQL error.
///
/// The offending request body is echoed back in the `request_body`
/// extension so a failing test shows what was actually sent.
pub fn validation_error_response(
    message: impl std::fmt::Display,
    request_body: &[u8],
) -> http::Response<Bytes> {
    let error = GraphQLError::new(message.to_string())
        .extension("code", VALIDATION_FAILED)
        .extension("path", "$.selectionSet.test")
        .extension(
            "request_body",
            String::from_utf8_lossy(request_body).into_owned(),
        );
    let body = encode_mock_response(&Value::Null, Some(&error));

    let mut response = http::Response::new(Bytes::from(body));
    *response.status_mut() = http::StatusCode::BAD_REQUEST;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_only() {
        let body = encode_mock_response(&json!({"user": {"id": 1}}), None);
        assert_eq!(body, r#"{"data":{"user":{"id":1}}}"#);

        let decoded: GraphQLResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(decoded.data, Some(json!({"user": {"id": 1}})));
        assert!(decoded.errors.is_empty());
    }

    #[test]
    fn test_error_only() {
        let error = GraphQLError::new("denied").extension("code", "forbidden");
        let body = encode_mock_response(&(), Some(&error));
        assert_eq!(
            body,
            r#"{"errors":[{"message":"denied","extensions":{"code":"forbidden"}}]}"#
        );
    }

    #[test]
    fn test_affected_rows() {
        assert_eq!(
            affected_rows_response("insert_user", 3),
            r#"{"data":{"insert_user":{"affected_rows":3}}}"#
        );
    }

    #[test]
    fn test_validation_error_response() {
        let response = validation_error_response("no match", b"{\"query\":\"{a}\"}");
        assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);

        let decoded: GraphQLResponse = serde_json::from_slice(response.body()).unwrap();
        let error = decoded.first_error().unwrap();
        assert_eq!(error.message, "no match");
        assert_eq!(error.code(), Some(VALIDATION_FAILED));
        assert_eq!(error.extensions["path"], "$.selectionSet.test");
        assert_eq!(error.extensions["request_body"], "{\"query\":\"{a}\"}");
    }

    #[test]
    #[should_panic(expected = "not serializable")]
    fn test_unserializable_data_panics() {
        use std::collections::HashMap;

        let mut data = HashMap::new();
        data.insert(vec![1u8], "non-string keys cannot become JSON");
        encode_mock_response(&data, None);
    }
}
