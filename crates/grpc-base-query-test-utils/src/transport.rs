use grpc_base_query::{
    Code, InvokeOptions, Metadata, MethodDescriptor, Transport, TransportError,
    transport::{RequestMessage, ResponseMessage},
};
use prost::Message;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Outcome {
    End { code: Code, message: Option<String> },
    Drop,
    Refuse(String),
}

/// What the mock transport does when a scripted method is invoked.
#[derive(Debug, Clone)]
pub struct MockReply {
    messages: Vec<Vec<u8>>,
    outcome: Outcome,
    spawned: bool,
}

impl MockReply {
    /// Ends the call with `OK` after the scripted messages.
    pub fn ok() -> Self {
        Self::status(Code::Ok, None)
    }

    /// Ends the call with `code` after the scripted messages.
    pub fn status(code: Code, message: Option<&str>) -> Self {
        Self {
            messages: Vec::new(),
            outcome: Outcome::End {
                code,
                message: message.map(str::to_string),
            },
            spawned: false,
        }
    }

    /// Refuses the call at dispatch.
    pub fn refuse(reason: &str) -> Self {
        Self {
            messages: Vec::new(),
            outcome: Outcome::Refuse(reason.to_string()),
            spawned: false,
        }
    }

    /// Delivers the scripted messages, then drops the call without ending it.
    pub fn dropped() -> Self {
        Self {
            messages: Vec::new(),
            outcome: Outcome::Drop,
            spawned: false,
        }
    }

    pub fn message<M: Message>(mut self, message: &M) -> Self {
        self.messages.push(message.encode_to_vec());
        self
    }

    /// Deliver from a spawned Tokio task instead of inside `invoke`.
    pub fn spawned(mut self) -> Self {
        self.spawned = true;
        self
    }
}

/// One invocation seen by a [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub response_stream: bool,
    pub host: Option<String>,
    pub metadata: Metadata,
    pub request: Vec<u8>,
}

impl RecordedCall {
    pub fn decode_request<M: Message + Default>(&self) -> Option<M> {
        M::decode(self.request.as_slice()).ok()
    }
}

/// Transport replaying scripted replies per method path.
///
/// Methods without a script end with `UNIMPLEMENTED`.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: HashMap<String, MockReply>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply<Req, Resp>(
        mut self,
        method: &MethodDescriptor<Req, Resp>,
        reply: MockReply,
    ) -> Self {
        self.replies.insert(method.path(), reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: RecordedCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Transport for MockTransport {
    fn invoke<Req, Resp>(
        &self,
        method: &MethodDescriptor<Req, Resp>,
        options: InvokeOptions<Req, Resp>,
    ) -> Result<(), TransportError>
    where
        Req: RequestMessage,
        Resp: ResponseMessage,
    {
        let path = method.path();
        let reply = self.replies.get(&path).cloned().unwrap_or_else(|| {
            MockReply::status(Code::Unimplemented, Some("no reply scripted"))
        });

        if let Outcome::Refuse(reason) = &reply.outcome {
            return Err(TransportError::Dispatch(reason.clone()));
        }

        let InvokeOptions {
            request,
            host,
            metadata,
            mut on_message,
            on_end,
            ..
        } = options;

        self.record(RecordedCall {
            path: path.clone(),
            response_stream: method.response_stream(),
            host,
            metadata,
            request: request.encode_to_vec(),
        });

        let decoded: Result<Vec<Resp>, prost::DecodeError> = reply
            .messages
            .iter()
            .map(|bytes| Resp::decode(bytes.as_slice()))
            .collect();
        let outcome = reply.outcome;

        let deliver = move || match decoded {
            Ok(messages) => {
                for message in messages {
                    on_message(message);
                }
                match outcome {
                    Outcome::End { code, message } => on_end(code, message),
                    Outcome::Drop | Outcome::Refuse(_) => {
                        log::debug!("mock transport dropping {path}");
                    }
                }
            }
            Err(err) => on_end(Code::Internal, Some(err.to_string())),
        };

        if reply.spawned {
            tokio::spawn(async move { deliver() });
        } else {
            deliver();
        }

        Ok(())
    }
}
