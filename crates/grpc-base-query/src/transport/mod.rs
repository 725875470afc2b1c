//! Transports that carry a call to the remote service.
//!
//! A transport exposes a single callback-style dispatch primitive: it is handed
//! the method, the request and two callbacks, and reports progress by invoking
//! `on_message` for each response and `on_end` exactly once when the call is
//! over. The bridge turns that protocol back into one awaited result.

pub mod grpc_web;

pub use grpc_web::{GrpcWebTransport, GrpcWebTransportConfig};

use crate::config::Metadata;
use crate::error::TransportError;
use crate::method::MethodDescriptor;
use crate::status::Code;

/// Invoked for every response message, in arrival order.
pub type OnMessage<Resp> = Box<dyn FnMut(Resp) + Send + 'static>;

/// Invoked once when the call ends, with the final status and its message.
pub type OnEnd = Box<dyn FnOnce(Code, Option<String>) + Send + 'static>;

/// Everything a transport needs to dispatch one call.
pub struct InvokeOptions<Req, Resp> {
    pub request: Req,
    pub host: Option<String>,
    pub metadata: Metadata,
    pub debug: bool,
    pub on_message: OnMessage<Resp>,
    pub on_end: OnEnd,
}

/// Message bounds shared by every transport.
pub trait RequestMessage: prost::Message + Send + Sync + 'static {}
impl<T> RequestMessage for T where T: prost::Message + Send + Sync + 'static {}

pub trait ResponseMessage: prost::Message + Default + Send + Sync + 'static {}
impl<T> ResponseMessage for T where T: prost::Message + Default + Send + Sync + 'static {}

pub trait Transport: Send + Sync + 'static {
    /// Start one call. Returns once the call is under way; progress is reported
    /// through the callbacks in `options`, possibly before this returns.
    ///
    /// An `Err` means the call was never dispatched and no callback will run.
    fn invoke<Req, Resp>(
        &self,
        method: &MethodDescriptor<Req, Resp>,
        options: InvokeOptions<Req, Resp>,
    ) -> Result<(), TransportError>
    where
        Req: RequestMessage,
        Resp: ResponseMessage;
}
