//! GraphQL client for queries and mutations.
//!
//! This module provides:
//! - Request and response envelope types
//! - Per-call [`QueryOptions`]
//! - A client that posts `cynic` operations through a pluggable
//!   [`Doer`](crate::Doer)
//!
//! # Example
//!
//! ```ignore
//! use cynic::QueryBuilder;
//! use gqlwrap::{Client, GraphQLClient, QueryOptions};
//!
//! #[derive(cynic::QueryVariables, Debug)]
//! struct UserArguments {
//!     id: cynic::Id,
//! }
//!
//! #[derive(cynic::QueryFragment, Debug)]
//! #[cynic(graphql_type = "Query", variables = "UserArguments")]
//! struct UserQuery {
//!     #[arguments(id: $id)]
//!     user: Option<User>,
//! }
//!
//! let client = GraphQLClient::builder("https://api.example.com/graphql").build_http()?;
//!
//! let operation = UserQuery::build(UserArguments { id: cynic::Id::new("123") });
//! let user = client.query(operation, &QueryOptions::new()).await?;
//! ```

mod client;
mod request;
mod response;

pub(crate) use request::prepare;

pub use client::{GraphQLClient, GraphQLClientBuilder};
pub use request::{GraphQLRequest, QueryOptions, Variables};
pub use response::{GraphQLError, GraphQLLocation, GraphQLResponse, PathSegment};
