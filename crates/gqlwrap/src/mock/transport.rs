//! A [`Doer`] that answers from memory.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use super::envelope::validation_error_response;
use super::matcher::{LooseMatcher, MockResponse, ResponseMatcher, StrictMatcher};
use crate::error::Result;
use crate::graphql::GraphQLRequest;
use crate::transport::Doer;

type Responder = dyn Fn(http::Request<Bytes>) -> http::Response<Bytes> + Send + Sync;

/// An HTTP transport stand-in that never touches the network.
///
/// Every request is handed to a responder function. The table-driven
/// constructors parse the body as a GraphQL request and ask a
/// [`ResponseMatcher`]; anything that cannot be answered comes back as a
/// `validation-failed` GraphQL error rather than a transport failure.
#[derive(Clone)]
pub struct MockTransport {
    responder: Arc<Responder>,
}

impl MockTransport {
    /// Answer every request with `responder`.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(http::Request<Bytes>) -> http::Response<Bytes> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
        }
    }

    /// Answer every request with the same body and status code.
    pub fn fixed(body: impl Into<Bytes>, status: http::StatusCode) -> Self {
        let body = body.into();
        Self::new(move |_request| {
            let mut response = http::Response::new(body.clone());
            *response.status_mut() = status;
            response
        })
    }

    /// Answer from a table matched on query text and variables.
    pub fn strict(expectations: impl IntoIterator<Item = MockResponse>) -> Self {
        Self::matching(StrictMatcher::new(expectations))
    }

    /// Answer from a table keyed by operation name or query text.
    pub fn loose<K, V>(responses: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::matching(LooseMatcher::new(responses))
    }

    /// Answer by parsing each request and consulting `matcher`.
    pub fn matching<M: ResponseMatcher + 'static>(matcher: M) -> Self {
        Self::new(move |request| respond(&matcher, request.into_body()))
    }

    /// Produce the response for `request` without going through a client.
    pub fn respond(&self, request: http::Request<Bytes>) -> http::Response<Bytes> {
        (self.responder)(request)
    }
}

fn respond(matcher: &impl ResponseMatcher, body: Bytes) -> http::Response<Bytes> {
    let request: GraphQLRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return validation_error_response(e, &body),
    };

    match matcher.find(&request) {
        Ok(found) => http::Response::new(found),
        Err(e) => validation_error_response(e, &body),
    }
}

impl Doer for MockTransport {
    async fn execute(&self, request: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Ok(self.respond(request))
    }
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport").finish_non_exhaustive()
    }
}
