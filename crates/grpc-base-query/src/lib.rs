//! A base query for data-fetching layers that talks gRPC-Web.
//!
//! [`grpc_base_query`] binds a proxy host and returns a [`GrpcBaseQuery`]. Each
//! call takes a [`MethodDescriptor`] and a request message, performs one
//! remote invocation, and resolves to a [`QueryResult`]: the response data
//! (one message, or every streamed message in order) or a [`GrpcQueryError`]
//! carrying the status code and message the call ended with.

pub mod bridge;
pub mod config;
pub mod error;
pub mod method;
pub mod one_or_many;
pub mod query;
pub mod result;
pub mod status;
pub mod transport;

pub use bridge::{GrpcBaseQuery, GrpcQueryResult, grpc_base_query};
pub use config::{GrpcBaseQueryConfig, Metadata};
pub use error::{GrpcQueryError, TransportError};
pub use method::{GrpcArgs, MethodDescriptor};
pub use one_or_many::OneOrMany;
pub use query::{BaseQueryApi, BaseQueryFn, QueryKind};
pub use result::QueryResult;
pub use status::Code;
pub use transport::{GrpcWebTransport, GrpcWebTransportConfig, InvokeOptions, Transport};

// Re-exported so callers build messages against the same versions
pub use async_trait::async_trait;
pub use prost;
pub use tonic;
