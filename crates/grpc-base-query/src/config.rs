use serde::Deserialize;
use std::collections::HashMap;

/// Request metadata (HTTP headers) sent with every call.
pub type Metadata = HashMap<String, String>;

/// Configuration bound into an adapter at creation time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GrpcBaseQueryConfig {
    /// The gRPC-Web proxy, typically in the form `http://example.com/`
    pub host: Option<String>,
    /// Metadata attached to every call
    pub metadata: Metadata,
    /// Log every dispatch, message and completion at debug level
    pub debug: bool,
}

impl GrpcBaseQueryConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The configured host, treating an empty string as absent.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref().filter(|host| !host.trim().is_empty())
    }
}
