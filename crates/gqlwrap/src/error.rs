//! Error types for the GraphQL client.

use crate::graphql::GraphQLError;

/// A specialized Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors returned by GraphQL clients and transports.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// The operation could not be turned into a request payload.
    #[error("Invalid operation: {0}")]
    Construct(String),

    /// HTTP request failed.
    #[error("HTTP request error: {0}")]
    Request(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Connection refused or failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid header name or value.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// HTTP error status (4xx or 5xx).
    #[error("HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// The response body, if it could be read.
        message: Option<String>,
    },

    /// The server answered with a GraphQL `errors` list.
    #[error("GraphQL error: {}", join_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// Invalid response body.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// A failed round trip annotated with the raw bodies (debug mode only).
    #[error("{source}; request: {request}; response: {response}")]
    Debug {
        /// The underlying failure.
        source: Box<ClientError>,
        /// The request body that was sent.
        request: String,
        /// The response body that came back, empty if none.
        response: String,
    },
}

impl ClientError {
    /// Create a construction error.
    pub fn construct(message: impl Into<String>) -> Self {
        Self::Construct(message.into())
    }

    /// The GraphQL errors carried by this error, looking through debug wrappers.
    pub fn graphql_errors(&self) -> &[GraphQLError] {
        match self {
            Self::GraphQL(errors) => errors,
            Self::Debug { source, .. } => source.graphql_errors(),
            _ => &[],
        }
    }
}

fn join_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<http::Error> for ClientError {
    fn from(err: http::Error) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for ClientError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for ClientError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}
