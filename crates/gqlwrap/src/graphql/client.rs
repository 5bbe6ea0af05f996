//! GraphQL client implementation.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use cynic::Operation;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::request::{GraphQLRequest, QueryOptions, Variables, prepare};
use super::response::{Envelope, GraphQLError};
use crate::capability::{Client, DebugToggle};
use crate::error::{ClientError, Result};
use crate::transport::{Doer, HttpTransport};

/// Builder for creating a GraphQL client.
pub struct GraphQLClientBuilder {
    url: String,
    default_headers: Vec<(String, String)>,
    debug: bool,
}

impl GraphQLClientBuilder {
    /// Create a new builder with the specified GraphQL endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            default_headers: Vec::new(),
            debug: false,
        }
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Set bearer token authentication.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.header("Authorization", value)
    }

    /// Attach raw request and response bodies to errors.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Build the client on top of the given transport.
    pub fn build<D: Doer>(self, doer: D) -> Result<GraphQLClient<D>> {
        let mut default_headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            default_headers.append(
                HeaderName::try_from(name.as_str())?,
                HeaderValue::try_from(value.as_str())?,
            );
        }

        Ok(GraphQLClient {
            inner: Arc::new(GraphQLClientInner {
                doer,
                url: self.url,
                default_headers,
            }),
            debug: self.debug,
        })
    }

    /// Build the client on top of a default [`HttpTransport`].
    pub fn build_http(self) -> Result<GraphQLClient<HttpTransport>> {
        let transport = HttpTransport::new()?;
        self.build(transport)
    }
}

struct GraphQLClientInner<D> {
    doer: D,
    url: String,
    default_headers: HeaderMap,
}

/// A GraphQL client for queries and mutations.
///
/// Query text comes from `cynic`; the payload is posted as JSON to a
/// single endpoint through a [`Doer`] and the answer is read as a
/// `cynic::GraphQlResponse`. Clones share the transport.
///
/// # Example
///
/// ```ignore
/// use cynic::QueryBuilder;
/// use gqlwrap::{Client, GraphQLClient, QueryOptions};
///
/// let client = GraphQLClient::builder("https://api.example.com/graphql")
///     .bearer_auth("my-token")
///     .build_http()?;
///
/// let viewer = client.query(ViewerQuery::build(()), &QueryOptions::new()).await?;
/// ```
pub struct GraphQLClient<D = HttpTransport> {
    inner: Arc<GraphQLClientInner<D>>,
    debug: bool,
}

impl<D> Clone for GraphQLClient<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            debug: self.debug,
        }
    }
}

impl GraphQLClient<HttpTransport> {
    /// Create a new builder for configuring a GraphQL client.
    pub fn builder(url: impl Into<String>) -> GraphQLClientBuilder {
        GraphQLClientBuilder::new(url)
    }
}

impl<D: Doer> GraphQLClient<D> {
    /// Create a client for `url` on top of `doer` with no default headers.
    pub fn new(url: impl Into<String>, doer: D) -> Self {
        Self {
            inner: Arc::new(GraphQLClientInner {
                doer,
                url: url.into(),
                default_headers: HeaderMap::new(),
            }),
            debug: false,
        }
    }

    /// Get the endpoint URL.
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Check if errors carry raw bodies.
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Post `request` and finish the envelope's `data` with `finish`.
    ///
    /// A non-2xx answer whose body is an envelope with errors yields
    /// [`ClientError::GraphQL`]; any other non-2xx answer yields
    /// [`ClientError::HttpStatus`].
    async fn round_trip<R>(
        &self,
        request: &GraphQLRequest,
        headers: &[(String, String)],
        finish: fn(Option<Value>) -> Result<R>,
    ) -> Result<R> {
        let body = Bytes::from(serde_json::to_vec(request)?);
        let http_request = self.http_request(body.clone(), headers)?;

        let response = match self.inner.doer.execute(http_request).await {
            Ok(response) => response,
            Err(err) => return Err(self.annotate(err, &body, &[])),
        };

        let status = response.status();
        let response_body = response.into_body();
        decode_envelope(status, &response_body)
            .and_then(finish)
            .map_err(|err| self.annotate(err, &body, &response_body))
    }

    fn http_request(
        &self,
        body: Bytes,
        headers: &[(String, String)],
    ) -> Result<http::Request<Bytes>> {
        let mut builder = http::Request::post(self.inner.url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        for (name, value) in &self.inner.default_headers {
            builder = builder.header(name, value);
        }
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        Ok(builder.body(body)?)
    }

    fn annotate(&self, err: ClientError, request: &[u8], response: &[u8]) -> ClientError {
        if !self.debug {
            return err;
        }
        ClientError::Debug {
            source: Box::new(err),
            request: String::from_utf8_lossy(request).into_owned(),
            response: String::from_utf8_lossy(response).into_owned(),
        }
    }

    fn payload(query: &str, variables: &Variables, options: &QueryOptions) -> GraphQLRequest {
        GraphQLRequest {
            query: query.to_string(),
            operation_name: options.operation_name.clone(),
            variables: variables.clone(),
        }
    }
}

/// Check the status and envelope, returning `data` when no errors came back.
fn decode_envelope(status: http::StatusCode, body: &[u8]) -> Result<Option<Value>> {
    if !status.is_success() {
        if let Ok(envelope) = serde_json::from_slice::<Envelope>(body)
            && let Some(errors) = reported(envelope.errors)
        {
            return Err(ClientError::GraphQL(errors));
        }
        return Err(ClientError::HttpStatus {
            status: status.as_u16(),
            message: Some(String::from_utf8_lossy(body).into_owned()),
        });
    }

    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| ClientError::InvalidBody(format!("not a GraphQL response: {e}")))?;
    match reported(envelope.errors) {
        Some(errors) => Err(ClientError::GraphQL(errors)),
        None => Ok(envelope.data),
    }
}

fn reported(
    errors: Option<Vec<cynic::GraphQlError<Map<String, Value>>>>,
) -> Option<Vec<GraphQLError>> {
    let errors = errors.filter(|errors| !errors.is_empty())?;
    Some(errors.into_iter().map(GraphQLError::from).collect())
}

fn typed_data<T: DeserializeOwned>(data: Option<Value>) -> Result<T> {
    let data = data.ok_or_else(|| ClientError::InvalidBody("response carries no data".into()))?;
    serde_json::from_value(data)
        .map_err(|e| ClientError::Json(format!("data does not fit the destination: {e}")))
}

fn raw_data(data: Option<Value>) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(&data.unwrap_or(Value::Null))?))
}

impl<D: Doer> Client for GraphQLClient<D> {
    async fn query<Q, V>(&self, operation: Operation<Q, V>, options: &QueryOptions) -> Result<Q>
    where
        Q: DeserializeOwned + fmt::Debug + Send,
        V: Serialize + Send,
    {
        let (request, options) = prepare(&operation, options)?;
        self.exec(&request.query, &request.variables, &options).await
    }

    async fn query_raw<Q, V>(
        &self,
        operation: Operation<Q, V>,
        options: &QueryOptions,
    ) -> Result<Bytes>
    where
        Q: Send,
        V: Serialize + Send,
    {
        let (request, options) = prepare(&operation, options)?;
        self.exec_raw(&request.query, &request.variables, &options)
            .await
    }

    async fn mutate<M, V>(&self, operation: Operation<M, V>, options: &QueryOptions) -> Result<M>
    where
        M: DeserializeOwned + fmt::Debug + Send,
        V: Serialize + Send,
    {
        let (request, options) = prepare(&operation, options)?;
        self.exec(&request.query, &request.variables, &options).await
    }

    async fn mutate_raw<M, V>(
        &self,
        operation: Operation<M, V>,
        options: &QueryOptions,
    ) -> Result<Bytes>
    where
        M: Send,
        V: Serialize + Send,
    {
        let (request, options) = prepare(&operation, options)?;
        self.exec_raw(&request.query, &request.variables, &options)
            .await
    }

    async fn exec<T: DeserializeOwned + fmt::Debug + Send>(
        &self,
        query: &str,
        variables: &Variables,
        options: &QueryOptions,
    ) -> Result<T> {
        let request = Self::payload(query, variables, options);
        self.round_trip(&request, &options.headers, typed_data::<T>)
            .await
    }

    async fn exec_raw(
        &self,
        query: &str,
        variables: &Variables,
        options: &QueryOptions,
    ) -> Result<Bytes> {
        let request = Self::payload(query, variables, options);
        self.round_trip(&request, &options.headers, raw_data).await
    }
}

impl<D: Doer> DebugToggle for GraphQLClient<D> {
    fn with_debug(&self, debug: bool) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            debug,
        }
    }
}

impl<D> fmt::Debug for GraphQLClient<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphQLClient")
            .field("url", &self.inner.url)
            .field("debug", &self.debug)
            .finish()
    }
}
