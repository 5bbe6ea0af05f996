//! Integration tests for the reqwest-backed transport.

mod common;

use std::time::Duration;

use common::user_by_id;
use gqlwrap::{
    Client, ClientError, GraphQLClient, GraphQLRequest, HttpTransport, LoggingClient, QueryOptions,
    Variables,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_query_over_http() {
    let expected = GraphQLRequest::from_operation(&user_by_id("42"))
        .expect("operation should encode")
        .operation_name("GetUser");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("content-type", "application/json"))
        .and(header("authorization", "Bearer token123"))
        .and(header("x-request-id", "abc"))
        .and(body_json(json!({
            "query": expected.query,
            "operationName": "GetUser",
            "variables": {"id": "42"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"user": {"id": 42, "name": "Ada"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GraphQLClient::builder(format!("{}/graphql", server.uri()))
        .bearer_auth("token123")
        .build(
            HttpTransport::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("Failed to build transport"),
        )
        .expect("Failed to build client");
    let client = LoggingClient::new(client);

    let options = QueryOptions::new()
        .operation_name("GetUser")
        .header("X-Request-Id", "abc");
    let found = client
        .query(user_by_id("42"), &options)
        .await
        .expect("query should succeed");

    let user = found.user.expect("user should be present");
    assert_eq!(user.id, 42);
    assert_eq!(user.name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_graphql_errors_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "not allowed", "path": ["user"]}]
        })))
        .mount(&server)
        .await;

    let client = GraphQLClient::builder(server.uri())
        .build_http()
        .expect("Failed to build client");

    let err = client
        .exec_raw("{user{id}}", &Variables::new(), &QueryOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "GraphQL error: not allowed (at user)");
}

#[tokio::test]
async fn test_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = GraphQLClient::builder(server.uri())
        .debug(true)
        .build_http()
        .expect("Failed to build client");

    let err = client
        .exec_raw("{user{id}}", &Variables::new(), &QueryOptions::new())
        .await
        .unwrap_err();

    match err {
        ClientError::Debug {
            source,
            request,
            response,
        } => {
            assert!(matches!(
                *source,
                ClientError::HttpStatus { status: 503, .. }
            ));
            assert_eq!(request, r#"{"query":"{user{id}}"}"#);
            assert_eq!(response, "maintenance");
        }
        other => panic!("expected a debug error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused() {
    // Nothing listens on port 9 locally
    let client = GraphQLClient::builder("http://127.0.0.1:9/graphql")
        .build_http()
        .expect("Failed to build client");

    let err = client
        .exec_raw("{user{id}}", &Variables::new(), &QueryOptions::new())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ClientError::Connection(_) | ClientError::Request(_)),
        "unexpected error: {err:?}"
    );
}
