//! GraphQL response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A GraphQL error returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    /// The error message.
    pub message: String,

    /// Locations in the document where the error occurred.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<GraphQLLocation>,

    /// Path to the field that caused the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,

    /// Additional error metadata, such as a `code`.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
}

impl GraphQLError {
    /// Create an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            extensions: Map::new(),
        }
    }

    /// Attach an extension entry.
    pub fn extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    /// The `code` extension, if present.
    pub fn code(&self) -> Option<&str> {
        self.extensions.get("code").and_then(Value::as_str)
    }
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(path) = self.path.as_deref().filter(|path| !path.is_empty()) {
            f.write_str(" (at ")?;
            for (i, segment) in path.iter().enumerate() {
                match segment {
                    PathSegment::Field(name) if i > 0 => write!(f, ".{name}")?,
                    PathSegment::Field(name) => f.write_str(name)?,
                    PathSegment::Index(index) => write!(f, "[{index}]")?,
                }
            }
            f.write_str(")")?;
        }
        match self.code() {
            Some(code) => write!(f, " [{code}]"),
            None => Ok(()),
        }
    }
}

impl std::error::Error for GraphQLError {}

/// A location in a GraphQL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQLLocation {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

/// A segment in an error path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// A field name.
    Field(String),
    /// An array index.
    Index(usize),
}

/// The `{data, errors}` envelope every GraphQL-over-HTTP response uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQLResponse {
    /// The data returned by the operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Errors that occurred during execution.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,

    /// Additional response metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQLResponse {
    /// Whether the server reported any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The first reported error.
    pub fn first_error(&self) -> Option<&GraphQLError> {
        self.errors.first()
    }
}

/// The envelope as `cynic` decodes it, with error extensions kept as a map.
pub(crate) type Envelope = cynic::GraphQlResponse<Value, Map<String, Value>>;

impl From<cynic::GraphQlError<Map<String, Value>>> for GraphQLError {
    fn from(error: cynic::GraphQlError<Map<String, Value>>) -> Self {
        let locations = error
            .locations
            .unwrap_or_default()
            .into_iter()
            .map(|location| GraphQLLocation {
                line: u32::try_from(location.line).unwrap_or_default(),
                column: u32::try_from(location.column).unwrap_or_default(),
            })
            .collect();
        let path = error.path.map(|path| {
            path.into_iter()
                .map(|segment| match segment {
                    cynic::GraphQlErrorPathSegment::Field(name) => PathSegment::Field(name),
                    cynic::GraphQlErrorPathSegment::Index(index) => {
                        PathSegment::Index(usize::try_from(index).unwrap_or_default())
                    }
                })
                .collect()
        });

        Self {
            message: error.message,
            locations,
            path,
            extensions: error.extensions.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> Vec<GraphQLError> {
        let envelope: Envelope = serde_json::from_str(body).unwrap();
        envelope
            .errors
            .unwrap_or_default()
            .into_iter()
            .map(GraphQLError::from)
            .collect()
    }

    #[test]
    fn test_errors_from_cynic_envelope() {
        let errors = decode(
            r#"{"data":null,"errors":[{"message":"User not found","locations":[{"line":1,"column":2}],"path":["users",0,"name"],"extensions":{"code":"not-found"}}]}"#,
        );
        assert_eq!(errors.len(), 1);

        let error = &errors[0];
        assert_eq!(error.locations, vec![GraphQLLocation { line: 1, column: 2 }]);
        assert_eq!(error.code(), Some("not-found"));
        assert_eq!(error.to_string(), "User not found (at users[0].name) [not-found]");
    }

    #[test]
    fn test_bare_error() {
        let errors = decode(r#"{"errors":[{"message":"boom"}]}"#);
        assert_eq!(errors, vec![GraphQLError::new("boom")]);
        assert_eq!(errors[0].to_string(), "boom");
    }

    #[test]
    fn test_envelope_round_trip() {
        let response = GraphQLResponse {
            data: None,
            errors: vec![GraphQLError::new("Permission denied").extension("code", "forbidden")],
            extensions: None,
        };
        let body = serde_json::to_string(&response).unwrap();
        assert_eq!(
            body,
            r#"{"errors":[{"message":"Permission denied","extensions":{"code":"forbidden"}}]}"#
        );

        let decoded: GraphQLResponse = serde_json::from_str(&body).unwrap();
        assert!(decoded.has_errors());
        assert_eq!(decoded.first_error(), response.first_error());
    }
}
