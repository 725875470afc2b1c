use crate::result::QueryResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Whether the calling endpoint reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    #[default]
    Query,
    Mutation,
}

/// Context the data-fetching layer passes alongside the arguments of a call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseQueryApi {
    /// Name of the endpoint issuing the call
    pub endpoint: String,
    pub kind: QueryKind,
}

impl BaseQueryApi {
    pub fn new(endpoint: impl Into<String>, kind: QueryKind) -> Self {
        Self {
            endpoint: endpoint.into(),
            kind,
        }
    }
}

/// The contract a data-fetching layer uses to run the network half of an
/// endpoint. Implementations never fail past this boundary: every failure is
/// reported as [`QueryResult::Error`].
#[async_trait]
pub trait BaseQueryFn<Args: Send + 'static>: Send + Sync {
    type Data: Send;
    type Error: Send;

    async fn query(&self, args: Args, api: &BaseQueryApi) -> QueryResult<Self::Data, Self::Error>;
}
