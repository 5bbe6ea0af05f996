//! GraphQL request payload and per-call options.

use cynic::Operation;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// Variables sent alongside a GraphQL operation.
pub type Variables = Map<String, Value>;

/// A GraphQL-over-HTTP request payload.
///
/// This is the body posted to the endpoint: `{query, operationName, variables}`.
/// Empty variables are left off the wire; absent or `null` variables read
/// back as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQLRequest {
    /// The GraphQL query string.
    #[serde(default)]
    pub query: String,

    /// Optional operation name (for documents with multiple operations).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "operationName"
    )]
    pub operation_name: Option<String>,

    /// Variables for the operation.
    #[serde(
        default,
        skip_serializing_if = "Map::is_empty",
        deserialize_with = "null_as_empty"
    )]
    pub variables: Variables,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Variables, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Variables>::deserialize(deserializer)?.unwrap_or_default())
}

impl GraphQLRequest {
    /// Create a request from raw query text.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let request = GraphQLRequest::new("query GetUser($id: ID!) { user(id: $id) { name } }")
    ///     .variable("id", "123")
    ///     .operation_name("GetUser");
    /// ```
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: None,
            variables: Variables::new(),
        }
    }

    /// Flatten a built `cynic` operation into a payload.
    ///
    /// Fails when the query text is blank or the variables do not encode as
    /// a JSON object; `()` variables become an empty map.
    pub fn from_operation<Q, V: Serialize>(operation: &Operation<Q, V>) -> Result<Self> {
        let request: Self = serde_json::to_value(operation)
            .and_then(serde_json::from_value)
            .map_err(|e| ClientError::construct(format!("operation does not encode: {e}")))?;
        if request.trimmed_query().is_empty() {
            return Err(ClientError::construct("operation has no query text"));
        }
        Ok(request)
    }

    /// Set a variable value.
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be serialized. Requests built this way are
    /// test expectations, so a bad value is a bug in the test.
    pub fn variable(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.variables.insert(name, value);
            }
            Err(e) => panic!("variable '{name}' is not serializable: {e}"),
        }
        self
    }

    /// Set the operation name.
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// The query text with surrounding whitespace removed.
    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    /// The operation name with surrounding whitespace removed, empty if unset.
    pub fn trimmed_operation_name(&self) -> &str {
        self.operation_name.as_deref().map(str::trim).unwrap_or_default()
    }

    /// Return a copy whose query and operation name are trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            query: self.trimmed_query().to_string(),
            operation_name: self
                .operation_name
                .as_ref()
                .map(|name| name.trim().to_string()),
            variables: self.variables.clone(),
        }
    }
}

/// Per-call options for an operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Operation name sent as `operationName`, replacing the one the
    /// operation carries.
    pub operation_name: Option<String>,
    /// Extra HTTP headers sent with this request only.
    pub headers: Vec<(String, String)>,
}

impl QueryOptions {
    /// Options with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operation name.
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Add a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Turn an operation and its options into the payload and options to send.
///
/// An explicit operation name in `options` wins over the operation's own.
pub(crate) fn prepare<Q, V: Serialize>(
    operation: &Operation<Q, V>,
    options: &QueryOptions,
) -> Result<(GraphQLRequest, QueryOptions)> {
    let request = GraphQLRequest::from_operation(operation)?;
    let mut options = options.clone();
    if options.operation_name.is_none() {
        options.operation_name = request.operation_name.clone();
    }
    Ok((request, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variables() {
        let request = GraphQLRequest::new("query($id: ID!) { user(id: $id) { name } }")
            .variable("id", "123")
            .variable("limit", 10);

        assert_eq!(request.variables["id"], "123");
        assert_eq!(request.variables["limit"], 10);
    }

    #[test]
    #[should_panic(expected = "variable 'id' is not serializable")]
    fn test_unserializable_variable_panics() {
        use std::collections::HashMap;

        let mut value = HashMap::new();
        value.insert(vec![1u8], 1);
        let _ = GraphQLRequest::new("query Q($id:Int!){a}").variable("id", value);
    }

    #[test]
    fn test_wire_format() {
        let request = GraphQLRequest::new("{user{id}}");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"query": "{user{id}}"})
        );

        let request = request.operation_name("GetUser").variable("foo", "bar");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"query": "{user{id}}", "operationName": "GetUser", "variables": {"foo": "bar"}})
        );
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let request: GraphQLRequest = serde_json::from_str(
            r#"{"query":"{a}","operationName":null,"variables":null}"#,
        )
        .unwrap();
        assert_eq!(request.operation_name, None);
        assert!(request.variables.is_empty());
        assert_eq!(request.trimmed_operation_name(), "");

        let request: GraphQLRequest = serde_json::from_str(r#"{"query":"{a}"}"#).unwrap();
        assert!(request.variables.is_empty());
    }

    #[test]
    fn test_trimmed() {
        let request = GraphQLRequest::new("  {user{id}}\n").operation_name(" GetUser ");
        let trimmed = request.trimmed();
        assert_eq!(trimmed.query, "{user{id}}");
        assert_eq!(trimmed.operation_name.as_deref(), Some("GetUser"));
    }

    #[test]
    fn test_options_builder() {
        let options = QueryOptions::new()
            .operation_name("GetUser")
            .header("X-Request-Id", "abc");
        assert_eq!(options.operation_name.as_deref(), Some("GetUser"));
        assert_eq!(options.headers, vec![("X-Request-Id".into(), "abc".into())]);
    }
}
