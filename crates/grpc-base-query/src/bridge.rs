//! The adapter between the base-query contract and a callback-style transport.
//!
//! Each call dispatches exactly once through the transport. The transport's
//! callbacks forward their events over a channel owned by the calling task,
//! which accumulates messages until the terminal status arrives and then
//! settles into a [`QueryResult`].

use crate::{
    config::GrpcBaseQueryConfig,
    error::GrpcQueryError,
    method::{GrpcArgs, MethodDescriptor},
    one_or_many::OneOrMany,
    query::{BaseQueryApi, BaseQueryFn},
    result::QueryResult,
    status::Code,
    transport::{GrpcWebTransport, InvokeOptions, RequestMessage, ResponseMessage, Transport},
};
use async_trait::async_trait;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::mpsc;

/// What a call through [`GrpcBaseQuery`] resolves to.
pub type GrpcQueryResult<Resp> = QueryResult<OneOrMany<Resp>, GrpcQueryError>;

/// Create an adapter speaking gRPC-Web to `config.host`.
///
/// ```no_run
/// use grpc_base_query::{GrpcBaseQueryConfig, grpc_base_query};
///
/// let base_query = grpc_base_query(GrpcBaseQueryConfig::new(
///     "https://api.your-really-great-app.com/v1/",
/// ));
/// ```
pub fn grpc_base_query(config: GrpcBaseQueryConfig) -> GrpcBaseQuery<GrpcWebTransport> {
    GrpcBaseQuery::with_transport(config, GrpcWebTransport::default())
}

/// Base query that issues every call as one gRPC invocation.
///
/// Cloning is cheap; clones share the configuration and the transport.
#[derive(Debug)]
pub struct GrpcBaseQuery<T> {
    config: Arc<GrpcBaseQueryConfig>,
    transport: Arc<T>,
}

impl<T> Clone for GrpcBaseQuery<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> GrpcBaseQuery<T> {
    /// Create an adapter that dispatches through a custom transport.
    pub fn with_transport(config: GrpcBaseQueryConfig, transport: T) -> Self {
        if config.host().is_none() {
            log::warn!(
                "No gRPC-Web host configured; calls through the default transport will fail unless a custom transport is supplied"
            );
        }

        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &GrpcBaseQueryConfig {
        &self.config
    }

    pub fn host(&self) -> Option<&str> {
        self.config.host()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one call and map its outcome into a [`GrpcQueryResult`].
    ///
    /// Never panics on transport failure; every failure is reported as
    /// [`QueryResult::Error`], including a transport that panics inside
    /// `invoke`.
    pub async fn call<Req, Resp>(&self, args: GrpcArgs<Req, Resp>) -> GrpcQueryResult<Resp>
    where
        Req: RequestMessage,
        Resp: ResponseMessage,
    {
        let GrpcArgs { method, request } = args;
        self.settle(&method, request).await.into()
    }

    async fn settle<Req, Resp>(
        &self,
        method: &MethodDescriptor<Req, Resp>,
        request: Req,
    ) -> Result<OneOrMany<Resp>, GrpcQueryError>
    where
        Req: RequestMessage,
        Resp: ResponseMessage,
    {
        let (events_tx, mut events) = mpsc::unbounded_channel();
        let end_tx = events_tx.clone();

        let options = InvokeOptions {
            request,
            host: self.config.host().map(str::to_string),
            metadata: self.config.metadata.clone(),
            debug: self.config.debug,
            on_message: Box::new(move |message| {
                let _ = events_tx.send(CallEvent::Message(message));
            }),
            on_end: Box::new(move |code, message| {
                let _ = end_tx.send(CallEvent::End { code, message });
            }),
        };

        match panic::catch_unwind(AssertUnwindSafe(|| self.transport.invoke(method, options))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                log::error!("Failed to dispatch {}: {}", method.path(), err);
                return Err(err.into());
            }
            Err(payload) => {
                let err = GrpcQueryError::dispatch_panicked(payload.as_ref());
                log::error!("Failed to dispatch {}: {}", method.path(), err.message);
                return Err(err);
            }
        }

        let mut pending = PendingResult::new(method.response_stream());
        while let Some(event) = events.recv().await {
            match event {
                CallEvent::Message(message) => pending.push(message),
                CallEvent::End { code, message } => {
                    let settled = pending.finish(code, message);
                    if let Err(err) = &settled {
                        log::debug!("{} failed: {}", method.path(), err);
                    }
                    return settled;
                }
            }
        }

        log::error!("{} was dropped by the transport before it ended", method.path());
        Err(GrpcQueryError::ended_without_status())
    }
}

#[async_trait]
impl<T, Req, Resp> BaseQueryFn<GrpcArgs<Req, Resp>> for GrpcBaseQuery<T>
where
    T: Transport,
    Req: RequestMessage,
    Resp: ResponseMessage,
{
    type Data = OneOrMany<Resp>;
    type Error = GrpcQueryError;

    async fn query(
        &self,
        args: GrpcArgs<Req, Resp>,
        api: &BaseQueryApi,
    ) -> QueryResult<Self::Data, Self::Error> {
        if self.config.debug {
            log::debug!(
                "{} ({:?}) calling {}",
                api.endpoint,
                api.kind,
                args.method.path()
            );
        }
        self.call(args).await
    }
}

enum CallEvent<M> {
    Message(M),
    End { code: Code, message: Option<String> },
}

/// Messages received so far by one call.
struct PendingResult<M> {
    data: Option<OneOrMany<M>>,
}

impl<M: Default> PendingResult<M> {
    fn new(response_stream: bool) -> Self {
        Self {
            data: response_stream.then(|| OneOrMany::Many(Vec::new())),
        }
    }

    /// Streams append; a unary method keeps only the latest message.
    fn push(&mut self, message: M) {
        match &mut self.data {
            Some(OneOrMany::Many(messages)) => messages.push(message),
            data => *data = Some(OneOrMany::One(message)),
        }
    }

    fn finish(self, code: Code, message: Option<String>) -> Result<OneOrMany<M>, GrpcQueryError> {
        if !code.is_ok() {
            return Err(GrpcQueryError::new(code, message.unwrap_or_default()));
        }
        // An OK unary call without a message carries the empty message.
        Ok(self.data.unwrap_or_else(|| OneOrMany::One(M::default())))
    }
}
