//! Mock transport for testing GraphQL-consuming code.
//!
//! These helpers build a [`GraphQLClient`] whose transport answers from
//! memory, so code written against [`Client`](crate::Client) can be tested
//! without a server:
//!
//! - [`mock_client`]: match on query text and variables
//! - [`mock_client_queries`]: match on operation name or query text
//! - [`mock_client_single`] / [`mock_client_single_body`]: one fixed answer
//!
//! # Example
//!
//! ```ignore
//! use gqlwrap::mock::{encode_mock_response, mock_client_queries};
//!
//! let client = mock_client_queries([(
//!     "GetUser",
//!     encode_mock_response(&json!({"user": {"id": 2}}), None),
//! )]);
//!
//! let options = QueryOptions::new().operation_name("GetUser");
//! let user = client.query(UserQuery::build(()), &options).await?;
//! ```
//!
//! Requests that match nothing come back as a 400 response carrying a
//! GraphQL error with `code: validation-failed`, which the client surfaces
//! as [`ClientError::GraphQL`](crate::ClientError::GraphQL).

mod envelope;
mod matcher;
mod transport;

use serde::Serialize;

use crate::graphql::{GraphQLClient, GraphQLError};

pub use envelope::{
    VALIDATION_FAILED, affected_rows_response, encode_mock_response, validation_error_response,
};
pub use matcher::{
    LooseMatcher, MatchError, MockResponse, ResponseMatcher, StrictMatcher, variables_equal,
};
pub use transport::MockTransport;

/// Endpoint used by the mock clients.
pub const MOCK_ENDPOINT: &str = "/v1/graphql";

/// A client answering from `expectations`, matched on trimmed query text and
/// structurally equal variables. When several entries match, the last wins.
pub fn mock_client(
    expectations: impl IntoIterator<Item = MockResponse>,
) -> GraphQLClient<MockTransport> {
    GraphQLClient::new(MOCK_ENDPOINT, MockTransport::strict(expectations))
}

/// A client answering from `(operation name or query, body)` pairs without
/// looking at variables. The first matching pair wins.
pub fn mock_client_queries<K, V>(
    responses: impl IntoIterator<Item = (K, V)>,
) -> GraphQLClient<MockTransport>
where
    K: Into<String>,
    V: Into<String>,
{
    GraphQLClient::new(MOCK_ENDPOINT, MockTransport::loose(responses))
}

/// A client that always answers with `data` and `error` encoded as an envelope.
///
/// # Panics
///
/// Panics if `data` cannot be serialized.
pub fn mock_client_single<T: Serialize + ?Sized>(
    data: &T,
    error: Option<&GraphQLError>,
) -> GraphQLClient<MockTransport> {
    mock_client_single_body(encode_mock_response(data, error))
}

/// A client that always answers with the raw `body` and status 200.
pub fn mock_client_single_body(body: impl Into<String>) -> GraphQLClient<MockTransport> {
    let body: String = body.into();
    GraphQLClient::new(MOCK_ENDPOINT, MockTransport::fixed(body, http::StatusCode::OK))
}
