//! An in-process `users.UserService` served over gRPC-Web.
//!
//! `GetUser` answers id 1 with `User { id: 1, name: "A" }` and anything else
//! with `NOT_FOUND: no such user`. `ListUsers` streams users `1..=page_size`.

use crate::messages::{GetUserRequest, ListUsersRequest, User};
use std::convert::Infallible;
use std::future::{Ready, ready};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::body::BoxBody;
use tonic::codec::ProstCodec;
use tonic::codegen::{BoxFuture, Context, Poll, Service, http};
use tonic::server::{Grpc, NamedService, ServerStreamingService, UnaryService};
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tonic_web::GrpcWebLayer;

/// Bind the user service on an ephemeral local port and serve it in the
/// background. Returns the address to use as the adapter host.
pub async fn serve_users() -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let incoming = TcpListenerStream::new(listener);

    tokio::spawn(async move {
        let served = Server::builder()
            .accept_http1(true)
            .layer(GrpcWebLayer::new())
            .add_service(UserService)
            .serve_with_incoming(incoming)
            .await;
        if let Err(err) = served {
            log::error!("user service stopped: {err}");
        }
    });

    Ok(addr)
}

#[derive(Debug, Clone, Copy)]
struct UserService;

impl NamedService for UserService {
    const NAME: &'static str = "users.UserService";
}

impl Service<http::Request<BoxBody>> for UserService {
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<BoxBody>) -> Self::Future {
        match req.uri().path() {
            "/users.UserService/GetUser" => Box::pin(async move {
                let mut grpc = Grpc::new(ProstCodec::<User, GetUserRequest>::default());
                Ok(grpc.unary(GetUser, req).await)
            }),
            "/users.UserService/ListUsers" => Box::pin(async move {
                let mut grpc = Grpc::new(ProstCodec::<User, ListUsersRequest>::default());
                Ok(grpc.server_streaming(ListUsers, req).await)
            }),
            _ => Box::pin(async move {
                let mut response = http::Response::new(tonic::codegen::empty_body());
                let headers = response.headers_mut();
                headers.insert("grpc-status", http::HeaderValue::from_static("12"));
                headers.insert(
                    http::header::CONTENT_TYPE,
                    http::HeaderValue::from_static("application/grpc"),
                );
                Ok(response)
            }),
        }
    }
}

struct GetUser;

impl UnaryService<GetUserRequest> for GetUser {
    type Response = User;
    type Future = Ready<Result<Response<User>, Status>>;

    fn call(&mut self, request: Request<GetUserRequest>) -> Self::Future {
        let reply = match request.into_inner().id {
            1 => Ok(Response::new(User::new(1, "A"))),
            _ => Err(Status::not_found("no such user")),
        };
        ready(reply)
    }
}

struct ListUsers;

impl ServerStreamingService<ListUsersRequest> for ListUsers {
    type Response = User;
    type ResponseStream = tokio_stream::Iter<std::vec::IntoIter<Result<User, Status>>>;
    type Future = Ready<Result<Response<Self::ResponseStream>, Status>>;

    fn call(&mut self, request: Request<ListUsersRequest>) -> Self::Future {
        let users: Vec<Result<User, Status>> = (1..=request.into_inner().page_size)
            .map(|id| Ok(User::new(id, "")))
            .collect();
        ready(Ok(Response::new(tokio_stream::iter(users))))
    }
}
