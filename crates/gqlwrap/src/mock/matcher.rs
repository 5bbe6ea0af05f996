//! Matching incoming requests against prepared responses.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Number, Value};

use crate::graphql::{GraphQLRequest, Variables};

/// Target used for matcher events.
const TARGET: &str = "gqlwrap::mock";

/// A prepared response for one request shape.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    /// The request this response answers.
    pub request: GraphQLRequest,
    /// The full response body, usually a `{data, errors}` envelope.
    pub response: Value,
}

impl MockResponse {
    /// Pair a request shape with the body returned for it.
    ///
    /// # Panics
    ///
    /// Panics if `response` cannot be serialized.
    pub fn new(request: GraphQLRequest, response: impl Serialize) -> Self {
        let response = match serde_json::to_value(response) {
            Ok(value) => value,
            Err(e) => panic!("mock response is not serializable: {e}"),
        };
        Self { request, response }
    }
}

/// Why no prepared response was returned.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MatchError {
    /// Nothing in the table matched the request.
    #[error("query not found in prepared responses: {prepared}")]
    NotFound {
        /// The prepared request shapes, for diagnosis.
        prepared: String,
    },
}

/// Finds the body to return for a parsed request.
pub trait ResponseMatcher: Send + Sync {
    /// Return the response body for `request`.
    fn find(&self, request: &GraphQLRequest) -> Result<Bytes, MatchError>;
}

/// Matches on trimmed query text and structurally equal variables.
///
/// The whole table is scanned and the last matching entry wins; when several
/// entries match, a warning names how many were shadowed.
#[derive(Debug, Clone)]
pub struct StrictMatcher {
    expectations: Vec<MockResponse>,
}

impl StrictMatcher {
    /// Prepare a table, trimming every expected query and operation name.
    pub fn new(expectations: impl IntoIterator<Item = MockResponse>) -> Self {
        let expectations = expectations
            .into_iter()
            .map(|mock| MockResponse {
                request: mock.request.trimmed(),
                response: mock.response,
            })
            .collect();
        Self { expectations }
    }
}

impl ResponseMatcher for StrictMatcher {
    fn find(&self, request: &GraphQLRequest) -> Result<Bytes, MatchError> {
        let query = request.trimmed_query();
        let mut matched = None;
        let mut hits = 0usize;

        for mock in &self.expectations {
            if mock.request.query != query {
                continue;
            }
            if variables_equal(&mock.request.variables, &request.variables) {
                matched = Some(mock);
                hits += 1;
            }
        }

        if hits > 1 {
            tracing::warn!(
                target: TARGET,
                query = %query,
                shadowed = hits - 1,
                "several prepared responses match; using the last one"
            );
        }

        match matched {
            Some(mock) => Ok(Bytes::from(mock.response.to_string())),
            None => Err(MatchError::NotFound {
                prepared: format!("{:?}", PreparedRequests(&self.expectations)),
            }),
        }
    }
}

struct PreparedRequests<'a>(&'a [MockResponse]);

impl fmt::Debug for PreparedRequests<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|mock| &mock.request))
            .finish()
    }
}

/// Matches on operation name or query text, ignoring variables.
///
/// Keys are compared trimmed against the request's operation name (when it
/// has one) and its query. The first key in insertion order wins; entries
/// with an empty body count as absent.
#[derive(Debug, Clone)]
pub struct LooseMatcher {
    responses: Vec<(String, String)>,
}

impl LooseMatcher {
    /// Prepare a table of `(operation name or query, response body)` pairs.
    pub fn new<K, V>(responses: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let responses = responses
            .into_iter()
            .map(|(key, body)| (key.into().trim().to_string(), body.into()))
            .collect();
        Self { responses }
    }
}

impl ResponseMatcher for LooseMatcher {
    fn find(&self, request: &GraphQLRequest) -> Result<Bytes, MatchError> {
        let operation_name = request.trimmed_operation_name();
        let query = request.trimmed_query();

        self.responses
            .iter()
            .find(|(key, body)| {
                !body.is_empty()
                    && ((!operation_name.is_empty() && key == operation_name) || key == query)
            })
            .map(|(_, body)| Bytes::from(body.clone()))
            .ok_or_else(|| MatchError::NotFound {
                prepared: format!(
                    "{:?}",
                    self.responses.iter().map(|(key, _)| key).collect::<Vec<_>>()
                ),
            })
    }
}

/// Compare variables, tolerating numeric representation differences.
///
/// Direct equality first; then both sides are compared with every number
/// widened to `f64`, so `1`, `1u64` and `1.0` are the same value.
pub fn variables_equal(expected: &Variables, actual: &Variables) -> bool {
    if expected == actual {
        return true;
    }
    expected.len() == actual.len()
        && expected.iter().all(|(name, value)| {
            actual
                .get(name)
                .is_some_and(|other| normalize(value) == normalize(other))
        })
}

fn normalize(value: &Value) -> Value {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(Number::from_f64)
            .map_or_else(|| value.clone(), Value::Number),
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), normalize(value)))
                .collect(),
        ),
        _ => value.clone(),
    }
}
