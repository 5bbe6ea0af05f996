//! The client capability interface.

use std::fmt;
use std::future::Future;

use bytes::Bytes;
use cynic::Operation;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::graphql::{QueryOptions, Variables};

/// The six operations a GraphQL client offers.
///
/// Queries and mutations arrive as `cynic` operations, built with
/// [`QueryBuilder`](cynic::QueryBuilder) and
/// [`MutationBuilder`](cynic::MutationBuilder); `exec` takes raw query text.
/// Production code and tests depend on this trait rather than on a concrete
/// client, so [`GraphQLClient`](crate::GraphQLClient),
/// [`LoggingClient`](crate::LoggingClient) or a hand-written fake can be
/// swapped in. Dropping a returned future cancels the call.
pub trait Client: Send + Sync {
    /// Run a query operation and decode the data into its fragment.
    fn query<Q, V>(
        &self,
        operation: Operation<Q, V>,
        options: &QueryOptions,
    ) -> impl Future<Output = Result<Q>> + Send
    where
        Q: DeserializeOwned + fmt::Debug + Send,
        V: Serialize + Send;

    /// Run a query operation and return the raw `data` JSON.
    fn query_raw<Q, V>(
        &self,
        operation: Operation<Q, V>,
        options: &QueryOptions,
    ) -> impl Future<Output = Result<Bytes>> + Send
    where
        Q: Send,
        V: Serialize + Send;

    /// Run a mutation operation and decode the data into its fragment.
    fn mutate<M, V>(
        &self,
        operation: Operation<M, V>,
        options: &QueryOptions,
    ) -> impl Future<Output = Result<M>> + Send
    where
        M: DeserializeOwned + fmt::Debug + Send,
        V: Serialize + Send;

    /// Run a mutation operation and return the raw `data` JSON.
    fn mutate_raw<M, V>(
        &self,
        operation: Operation<M, V>,
        options: &QueryOptions,
    ) -> impl Future<Output = Result<Bytes>> + Send
    where
        M: Send,
        V: Serialize + Send;

    /// Run a raw query string and decode the data into `T`.
    fn exec<T: DeserializeOwned + fmt::Debug + Send>(
        &self,
        query: &str,
        variables: &Variables,
        options: &QueryOptions,
    ) -> impl Future<Output = Result<T>> + Send;

    /// Run a raw query string and return the raw `data` JSON.
    fn exec_raw(
        &self,
        query: &str,
        variables: &Variables,
        options: &QueryOptions,
    ) -> impl Future<Output = Result<Bytes>> + Send;
}

/// Clients whose own verbosity can be switched.
pub trait DebugToggle: Sized {
    /// Return a copy with debug mode set.
    fn with_debug(&self, debug: bool) -> Self;
}
