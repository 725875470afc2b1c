use grpc_base_query::{
    Code, GrpcArgs, GrpcBaseQueryConfig, GrpcQueryError, OneOrMany, QueryResult,
    grpc_base_query,
};
use grpc_base_query_test_utils::{
    GET_USER, GetUserRequest, LIST_USERS, ListUsersRequest, User, init_logging, serve_users,
};
use std::net::SocketAddr;

async fn server() -> SocketAddr {
    init_logging();
    serve_users().await.expect("bind local user service")
}

fn config(addr: SocketAddr) -> GrpcBaseQueryConfig {
    GrpcBaseQueryConfig::new(format!("http://{addr}")).with_debug(true)
}

#[tokio::test]
async fn test_unary_call_over_grpc_web() {
    let addr = server().await;
    let base_query = grpc_base_query(config(addr));

    let result = base_query
        .call(GrpcArgs::new(GET_USER, GetUserRequest { id: 1 }))
        .await;

    assert_eq!(result, QueryResult::Data(OneOrMany::One(User::new(1, "A"))));
}

#[tokio::test]
async fn test_server_streaming_call_over_grpc_web_keeps_order() {
    let addr = server().await;
    let base_query = grpc_base_query(config(addr));

    let result = base_query
        .call(GrpcArgs::new(LIST_USERS, ListUsersRequest { page_size: 3 }))
        .await;

    assert_eq!(
        result,
        QueryResult::Data(OneOrMany::Many(vec![
            User::new(1, ""),
            User::new(2, ""),
            User::new(3, ""),
        ]))
    );
}

#[tokio::test]
async fn test_empty_stream_over_grpc_web() {
    let addr = server().await;
    let base_query = grpc_base_query(config(addr));

    let result = base_query
        .call(GrpcArgs::new(LIST_USERS, ListUsersRequest { page_size: 0 }))
        .await;

    assert_eq!(result, QueryResult::Data(OneOrMany::Many(vec![])));
}

#[tokio::test]
async fn test_status_trailer_over_grpc_web_becomes_error() {
    let addr = server().await;
    let base_query = grpc_base_query(config(addr));

    let result = base_query
        .call(GrpcArgs::new(GET_USER, GetUserRequest { id: 2 }))
        .await;

    assert_eq!(
        result,
        QueryResult::Error(GrpcQueryError::new(Code::NotFound, "no such user"))
    );
}

#[tokio::test]
async fn test_metadata_does_not_disturb_grpc_web_call() {
    let addr = server().await;
    let base_query =
        grpc_base_query(config(addr).with_metadata("authorization", "Bearer token"));

    let result = base_query
        .call(GrpcArgs::new(GET_USER, GetUserRequest { id: 1 }))
        .await;

    assert!(result.is_data());
}
