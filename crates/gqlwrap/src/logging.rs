//! Debug logging around GraphQL operations.
//!
//! [`LoggingClient`] decorates any [`Client`] and, when the configured
//! [`Logger`] has `DEBUG` enabled for the `gqlwrap::client` target, emits one
//! event per operation:
//!
//! - `DEBUG` on success, with `query`, `variables` and `response` fields
//! - `ERROR` on failure, with `query`, `variables` and `error` fields
//!
//! The event message is the operation (`Query`, `QueryRaw`, `Mutate`,
//! `MutateRaw`, `Exec`, `ExecRaw`). With debug disabled nothing is recorded
//! and no field values are built.
//!
//! # Example
//!
//! ```ignore
//! use gqlwrap::{GraphQLClient, Logger, LoggingClient};
//!
//! let client = LoggingClient::new(GraphQLClient::builder(url).build_http()?);
//!
//! // Route this client's events to a dedicated subscriber.
//! let subscriber = tracing_subscriber::fmt()
//!     .with_max_level(tracing::Level::DEBUG)
//!     .finish();
//! let verbose = client.with_logger(Logger::from_subscriber(subscriber));
//! ```

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use cynic::Operation;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::subscriber::NoSubscriber;
use tracing::{Dispatch, Level, Subscriber};

use crate::capability::{Client, DebugToggle};
use crate::error::{ClientError, Result};
use crate::graphql::{QueryOptions, Variables, prepare};

/// Target used for every event emitted by [`LoggingClient`].
pub const TARGET: &str = "gqlwrap::client";

/// The sink for [`LoggingClient`] events.
///
/// The default logger has no dispatcher of its own and emits through
/// whichever `tracing` dispatcher is current on the calling thread.
#[derive(Clone, Default)]
pub struct Logger {
    dispatch: Option<Dispatch>,
}

impl Logger {
    /// A logger that uses the current dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger pinned to `dispatch`.
    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    /// A logger pinned to `subscriber`.
    pub fn from_subscriber<S>(subscriber: S) -> Self
    where
        S: Subscriber + Send + Sync + 'static,
    {
        Self::with_dispatch(Dispatch::new(subscriber))
    }

    /// A logger that drops everything.
    pub fn disabled() -> Self {
        Self::from_subscriber(NoSubscriber::default())
    }

    /// Check whether debug events would be recorded.
    pub fn debug_enabled(&self) -> bool {
        self.in_scope(|| tracing::enabled!(target: TARGET, Level::DEBUG))
    }

    fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("pinned", &self.dispatch.is_some())
            .finish()
    }
}

/// What an operation produced, as it should appear in the log.
enum Outcome<'a> {
    Decoded(&'a dyn fmt::Debug),
    Raw(&'a [u8]),
    Failed(&'a ClientError),
}

/// Query text and variables captured before dispatch.
struct Captured<'a> {
    operation: &'static str,
    query: &'a str,
    variables: String,
}

impl Logger {
    fn capture<'a>(
        &self,
        operation: &'static str,
        query: &'a str,
        variables: &Variables,
    ) -> Option<Captured<'a>> {
        if !self.debug_enabled() {
            return None;
        }
        let variables = serde_json::to_string(variables).unwrap_or_else(|e| e.to_string());
        Some(Captured {
            operation,
            query,
            variables,
        })
    }

    fn record(&self, captured: &Captured<'_>, outcome: Outcome<'_>) {
        let Captured {
            operation,
            query,
            variables,
        } = captured;
        self.in_scope(|| match outcome {
            Outcome::Failed(error) => tracing::error!(
                target: TARGET,
                variables = %variables,
                query = %query,
                error = %error,
                "{operation}"
            ),
            Outcome::Decoded(response) => tracing::debug!(
                target: TARGET,
                variables = %variables,
                query = %query,
                response = ?response,
                "{operation}"
            ),
            Outcome::Raw(bytes) => tracing::debug!(
                target: TARGET,
                variables = %variables,
                query = %query,
                response = %String::from_utf8_lossy(bytes),
                "{operation}"
            ),
        });
    }
}

/// A [`Client`] decorator that logs every operation at debug level.
///
/// The decorator keeps the wrapped client's contract: same inputs, same
/// outputs, same errors. Operations are flattened to query text here and
/// sent through the wrapped client's `exec`/`exec_raw`, so an operation that
/// cannot be encoded fails before anything is dispatched or logged.
pub struct LoggingClient<C> {
    inner: Arc<C>,
    logger: Logger,
}

impl<C> Clone for LoggingClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            logger: self.logger.clone(),
        }
    }
}

impl<C: Client> LoggingClient<C> {
    /// Wrap `inner` with the default [`Logger`].
    pub fn new(inner: C) -> Self {
        Self {
            inner: Arc::new(inner),
            logger: Logger::default(),
        }
    }

    /// Return a decorator sharing the same inner client with a different logger.
    pub fn with_logger(&self, logger: Logger) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            logger,
        }
    }

    /// The logger in use.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The wrapped client.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    async fn exec_logged<T: DeserializeOwned + fmt::Debug + Send>(
        &self,
        operation: &'static str,
        query: &str,
        variables: &Variables,
        options: &QueryOptions,
    ) -> Result<T> {
        let captured = self.logger.capture(operation, query, variables);
        let result = self.inner.exec::<T>(query, variables, options).await;

        if let Some(captured) = &captured {
            match &result {
                Ok(response) => self.logger.record(captured, Outcome::Decoded(response)),
                Err(error) => self.logger.record(captured, Outcome::Failed(error)),
            }
        }
        result
    }

    async fn exec_raw_logged(
        &self,
        operation: &'static str,
        query: &str,
        variables: &Variables,
        options: &QueryOptions,
    ) -> Result<Bytes> {
        let captured = self.logger.capture(operation, query, variables);
        let result = self.inner.exec_raw(query, variables, options).await;

        if let Some(captured) = &captured {
            match &result {
                Ok(bytes) => self.logger.record(captured, Outcome::Raw(bytes)),
                Err(error) => self.logger.record(captured, Outcome::Failed(error)),
            }
        }
        result
    }
}

impl<C: Client + DebugToggle> LoggingClient<C> {
    /// Return a decorator, with the same logger, whose inner client has
    /// debug mode set.
    pub fn with_debug(&self, debug: bool) -> Self {
        Self {
            inner: Arc::new(self.inner.with_debug(debug)),
            logger: self.logger.clone(),
        }
    }
}

impl<C: Client> Client for LoggingClient<C> {
    async fn query<Q, V>(&self, operation: Operation<Q, V>, options: &QueryOptions) -> Result<Q>
    where
        Q: DeserializeOwned + fmt::Debug + Send,
        V: Serialize + Send,
    {
        let (request, options) = prepare(&operation, options)?;
        self.exec_logged("Query", &request.query, &request.variables, &options)
            .await
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
        self.exec_raw_logged("QueryRaw", &request.query, &request.variables, &options)
            .await
    }

    async fn mutate<M, V>(&self, operation: Operation<M, V>, options: &QueryOptions) -> Result<M>
    where
        M: DeserializeOwned + fmt::Debug + Send,
        V: Serialize + Send,
    {
        let (request, options) = prepare(&operation, options)?;
        self.exec_logged("Mutate", &request.query, &request.variables, &options)
            .await
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
        self.exec_raw_logged("MutateRaw", &request.query, &request.variables, &options)
            .await
    }

    async fn exec<T: DeserializeOwned + fmt::Debug + Send>(
        &self,
        query: &str,
        variables: &Variables,
        options: &QueryOptions,
    ) -> Result<T> {
        self.exec_logged("Exec", query, variables, options).await
    }

    async fn exec_raw(
        &self,
        query: &str,
        variables: &Variables,
        options: &QueryOptions,
    ) -> Result<Bytes> {
        self.exec_raw_logged("ExecRaw", query, variables, options)
            .await
    }
}

impl<C: fmt::Debug> fmt::Debug for LoggingClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingClient")
            .field("inner", &self.inner)
            .field("logger", &self.logger)
            .finish()
    }
}
