use super::{InvokeOptions, OnEnd, OnMessage, RequestMessage, ResponseMessage, Transport};
use crate::{config::Metadata, error::TransportError, method::MethodDescriptor, status::Code};
use http::uri::{PathAndQuery, Uri};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use tonic::{
    Request, Status,
    codec::ProstCodec,
    metadata::{AsciiMetadataKey, AsciiMetadataValue, MetadataMap},
};
use tonic_web::GrpcWebClientLayer;
use tower::ServiceBuilder;

/// Limits applied to every call made through a [`GrpcWebTransport`]
#[derive(Debug, Clone)]
pub struct GrpcWebTransportConfig {
    /// Maximum size of a decoded response message in bytes (default: 4MB)
    pub max_decoding_message_size: usize,
    /// Maximum size of an encoded request message in bytes (default: 4MB)
    pub max_encoding_message_size: usize,
}

impl Default for GrpcWebTransportConfig {
    fn default() -> Self {
        Self {
            max_decoding_message_size: 4 * 1024 * 1024, // 4MB
            max_encoding_message_size: 4 * 1024 * 1024,
        }
    }
}

/// gRPC-Web transport over HTTP/1.1, speaking to a gRPC-Web proxy.
///
/// Unary and server-streaming methods travel the same way: every decoded
/// response is handed to `on_message`, then `on_end` gets the final status.
/// Each call runs on its own Tokio task.
#[derive(Debug, Clone, Default)]
pub struct GrpcWebTransport {
    config: GrpcWebTransportConfig,
}

impl GrpcWebTransport {
    pub fn new(config: GrpcWebTransportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GrpcWebTransportConfig {
        &self.config
    }
}

impl Transport for GrpcWebTransport {
    fn invoke<Req, Resp>(
        &self,
        method: &MethodDescriptor<Req, Resp>,
        options: InvokeOptions<Req, Resp>,
    ) -> Result<(), TransportError>
    where
        Req: RequestMessage,
        Resp: ResponseMessage,
    {
        if method.request_stream() {
            return Err(TransportError::ClientStreamingUnsupported(method.path()));
        }

        let host = options
            .host
            .as_deref()
            .filter(|host| !host.trim().is_empty())
            .ok_or(TransportError::MissingHost)?;
        let origin = parse_origin(host)?;
        let path = PathAndQuery::try_from(method.path())
            .map_err(|_| TransportError::InvalidPath(method.path()))?;
        let metadata = build_metadata(&options.metadata)?;
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| TransportError::NoRuntime)?;

        let InvokeOptions {
            request,
            debug,
            on_message,
            on_end,
            ..
        } = options;

        let mut request = Request::new(request);
        *request.metadata_mut() = metadata;

        if debug {
            log::debug!("grpc-web invoke {} via {}", path, origin);
        }

        let call = Call {
            origin,
            path,
            config: self.config.clone(),
            debug,
        };
        runtime.spawn(call.drive(request, on_message, on_end));

        Ok(())
    }
}

/// One dispatched call, owned by its task.
struct Call {
    origin: Uri,
    path: PathAndQuery,
    config: GrpcWebTransportConfig,
    debug: bool,
}

impl Call {
    async fn drive<Req, Resp>(
        self,
        request: Request<Req>,
        mut on_message: OnMessage<Resp>,
        on_end: OnEnd,
    ) where
        Req: RequestMessage,
        Resp: ResponseMessage,
    {
        let debug = self.debug;
        let path = self.path.clone();

        match self.stream_responses(request, &mut on_message).await {
            Ok(()) => {
                if debug {
                    log::debug!("grpc-web {} ended with {}", path, Code::Ok);
                }
                on_end(Code::Ok, None);
            }
            Err(status) => {
                let code = Code::from(status.code());
                if debug {
                    log::debug!("grpc-web {} ended with {}: {}", path, code, status.message());
                }
                on_end(code, Some(status.message().to_string()));
            }
        }
    }

    async fn stream_responses<Req, Resp>(
        self,
        request: Request<Req>,
        on_message: &mut OnMessage<Resp>,
    ) -> Result<(), Status>
    where
        Req: RequestMessage,
        Resp: ResponseMessage,
    {
        let client = Client::builder(TokioExecutor::new()).build_http();
        let service = ServiceBuilder::new()
            .layer(GrpcWebClientLayer::new())
            .service(client);

        let mut grpc = tonic::client::Grpc::with_origin(service, self.origin)
            .max_decoding_message_size(self.config.max_decoding_message_size)
            .max_encoding_message_size(self.config.max_encoding_message_size);

        grpc.ready()
            .await
            .map_err(|e| Status::unavailable(format!("Service was not ready: {}", e)))?;

        let codec = ProstCodec::<Req, Resp>::default();
        let mut stream = grpc
            .server_streaming(request, self.path.clone(), codec)
            .await?
            .into_inner();

        while let Some(message) = stream.message().await? {
            if self.debug {
                log::debug!("grpc-web {} received message", self.path);
            }
            on_message(message);
        }

        Ok(())
    }
}

fn parse_origin(host: &str) -> Result<Uri, TransportError> {
    let invalid = |reason: String| TransportError::InvalidHost {
        host: host.to_string(),
        reason,
    };

    let origin = host.parse::<Uri>().map_err(|e| invalid(e.to_string()))?;
    if origin.scheme().is_none() || origin.authority().is_none() {
        return Err(invalid("expected scheme and authority".to_string()));
    }
    Ok(origin)
}

fn build_metadata(entries: &Metadata) -> Result<MetadataMap, TransportError> {
    let mut metadata = MetadataMap::with_capacity(entries.len());
    for (name, value) in entries {
        let key: AsciiMetadataKey = name
            .parse()
            .map_err(|_| TransportError::InvalidMetadata(name.clone()))?;
        let value: AsciiMetadataValue = value
            .parse()
            .map_err(|_| TransportError::InvalidMetadata(name.clone()))?;
        metadata.insert(key, value);
    }
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn get_text() -> MethodDescriptor<String, String> {
        MethodDescriptor::unary("text.TextService", "GetText")
    }

    fn options(host: Option<&str>) -> InvokeOptions<String, String> {
        InvokeOptions {
            request: "hello".to_string(),
            host: host.map(str::to_string),
            metadata: Metadata::new(),
            debug: false,
            on_message: Box::new(|_| {}),
            on_end: Box::new(|_, _| {}),
        }
    }

    #[test]
    fn test_rejects_missing_host() {
        let transport = GrpcWebTransport::default();
        let err = transport.invoke(&get_text(), options(None)).unwrap_err();
        assert!(matches!(err, TransportError::MissingHost));

        let err = transport.invoke(&get_text(), options(Some(""))).unwrap_err();
        assert!(matches!(err, TransportError::MissingHost));
    }

    #[test]
    fn test_rejects_host_without_scheme() {
        let transport = GrpcWebTransport::default();
        let err = transport
            .invoke(&get_text(), options(Some("localhost:8080")))
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidHost { .. }));
    }

    #[test]
    fn test_rejects_client_streaming() {
        let transport = GrpcWebTransport::default();
        let upload: MethodDescriptor<String, String> =
            MethodDescriptor::client_streaming("text.TextService", "Upload");
        let err = transport
            .invoke(&upload, options(Some("http://localhost:8080")))
            .unwrap_err();
        assert!(matches!(err, TransportError::ClientStreamingUnsupported(path) if path == "/text.TextService/Upload"));
    }

    #[test]
    fn test_rejects_invalid_metadata() {
        let transport = GrpcWebTransport::default();
        let mut opts = options(Some("http://localhost:8080"));
        opts.metadata.insert("bad header".to_string(), "v".to_string());
        let err = transport.invoke(&get_text(), opts).unwrap_err();
        assert!(matches!(err, TransportError::InvalidMetadata(name) if name == "bad header"));
    }

    #[test]
    fn test_requires_runtime() {
        let transport = GrpcWebTransport::default();
        let err = transport
            .invoke(&get_text(), options(Some("http://localhost:8080")))
            .unwrap_err();
        assert!(matches!(err, TransportError::NoRuntime));
    }

    #[tokio::test]
    async fn test_unreachable_host_ends_with_error() {
        let transport = GrpcWebTransport::default();
        let (tx, rx) = oneshot::channel();
        let mut opts = options(Some("http://127.0.0.1:1"));
        opts.on_end = Box::new(move |code, message| {
            let _ = tx.send((code, message));
        });

        transport.invoke(&get_text(), opts).unwrap();

        let (code, message) = rx.await.unwrap();
        assert!(!code.is_ok());
        assert!(message.is_some());
    }

    #[test]
    fn test_build_metadata() {
        let mut entries = Metadata::new();
        entries.insert("authorization".to_string(), "Bearer abc".to_string());
        let metadata = build_metadata(&entries).unwrap();
        let value = metadata.get("authorization").unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
    }
}
