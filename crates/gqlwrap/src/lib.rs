//! A GraphQL client wrapper with level-gated debug logging.
//!
//! This crate provides:
//!
//! - **Client interface**: the [`Client`] trait with `query`, `query_raw`,
//!   `mutate`, `mutate_raw`, `exec` and `exec_raw`
//! - **GraphQL client**: [`GraphQLClient`], which posts `cynic` operations
//!   through a [`Doer`] and decodes the `{data, errors}` envelope
//! - **Logging decorator**: [`LoggingClient`], which logs query, variables and
//!   response or error through `tracing` when debug is enabled
//! - **Mock transport**: the [`mock`] module, answering requests from a
//!   table of prepared responses (feature `mock`, on by default)
//!
//! # Logging
//!
//! Events are emitted on the `gqlwrap::client` target. To see them, install
//! a subscriber with debug enabled for that target:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("gqlwrap::client=debug")
//!     .init();
//!
//! let client = LoggingClient::new(GraphQLClient::builder(url).build_http()?);
//! let viewer = client.query(ViewerQuery::build(()), &QueryOptions::new()).await?;
//! ```
//!
//! # Testing
//!
//! ```ignore
//! use gqlwrap::mock::{encode_mock_response, mock_client_single};
//!
//! let client = LoggingClient::new(mock_client_single(&json!({"viewer": {"id": 1}}), None));
//! let viewer = client.query(ViewerQuery::build(()), &QueryOptions::new()).await?;
//! assert_eq!(viewer.viewer.unwrap().id, 1);
//! ```

mod capability;
mod error;
pub mod graphql;
mod logging;
#[cfg(feature = "mock")]
pub mod mock;
mod transport;

pub use capability::{Client, DebugToggle};
pub use error::{ClientError, Result};
pub use logging::{Logger, LoggingClient, TARGET};
pub use transport::{Doer, HttpTransport, HttpTransportBuilder, TransportConfig};

// Re-export commonly used types at the crate root
pub use graphql::{
    GraphQLClient, GraphQLClientBuilder, GraphQLError, GraphQLRequest, GraphQLResponse,
    QueryOptions, Variables,
};

// Operations are built with cynic's derives and builders
pub use cynic;
