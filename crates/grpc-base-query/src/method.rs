use std::fmt;
use std::marker::PhantomData;

/// Describes one remote procedure: where it lives and how its messages flow.
///
/// The request and response message types are carried at the type level only;
/// the descriptor itself is plain metadata and is cheap to clone.
pub struct MethodDescriptor<Req, Resp> {
    service_name: &'static str,
    method_name: &'static str,
    request_stream: bool,
    response_stream: bool,
    _types: PhantomData<fn(Req) -> Resp>,
}

impl<Req, Resp> MethodDescriptor<Req, Resp> {
    /// A method returning at most one response message.
    pub const fn unary(service_name: &'static str, method_name: &'static str) -> Self {
        Self {
            service_name,
            method_name,
            request_stream: false,
            response_stream: false,
            _types: PhantomData,
        }
    }

    /// A method whose response is a stream of zero or more messages.
    pub const fn server_streaming(service_name: &'static str, method_name: &'static str) -> Self {
        Self {
            service_name,
            method_name,
            request_stream: false,
            response_stream: true,
            _types: PhantomData,
        }
    }

    /// A method taking a request stream. Described for completeness; gRPC-Web
    /// transports reject it at dispatch.
    pub const fn client_streaming(service_name: &'static str, method_name: &'static str) -> Self {
        Self {
            service_name,
            method_name,
            request_stream: true,
            response_stream: false,
            _types: PhantomData,
        }
    }

    pub fn service_name(&self) -> &'static str {
        self.service_name
    }

    pub fn method_name(&self) -> &'static str {
        self.method_name
    }

    pub fn request_stream(&self) -> bool {
        self.request_stream
    }

    pub fn response_stream(&self) -> bool {
        self.response_stream
    }

    /// HTTP path of the method, e.g. `/users.UserService/GetUser`.
    pub fn path(&self) -> String {
        format!("/{}/{}", self.service_name, self.method_name)
    }
}

// Derives would add `Req`/`Resp` bounds.
impl<Req, Resp> Clone for MethodDescriptor<Req, Resp> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Req, Resp> Copy for MethodDescriptor<Req, Resp> {}

impl<Req, Resp> fmt::Debug for MethodDescriptor<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("service_name", &self.service_name)
            .field("method_name", &self.method_name)
            .field("request_stream", &self.request_stream)
            .field("response_stream", &self.response_stream)
            .finish()
    }
}

/// Arguments of one adapter call.
pub struct GrpcArgs<Req, Resp> {
    pub method: MethodDescriptor<Req, Resp>,
    pub request: Req,
}

impl<Req, Resp> GrpcArgs<Req, Resp> {
    pub fn new(method: MethodDescriptor<Req, Resp>, request: Req) -> Self {
        Self { method, request }
    }
}

impl<Req: fmt::Debug, Resp> fmt::Debug for GrpcArgs<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrpcArgs")
            .field("method", &self.method)
            .field("request", &self.request)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_flags() {
        let get: MethodDescriptor<(), ()> = MethodDescriptor::unary("users.UserService", "GetUser");
        assert_eq!(get.path(), "/users.UserService/GetUser");
        assert!(!get.response_stream());
        assert!(!get.request_stream());

        let list: MethodDescriptor<(), ()> =
            MethodDescriptor::server_streaming("users.UserService", "ListUsers");
        assert!(list.response_stream());

        let upload: MethodDescriptor<(), ()> =
            MethodDescriptor::client_streaming("users.UserService", "Upload");
        assert!(upload.request_stream());
        assert!(!upload.response_stream());
    }
}
