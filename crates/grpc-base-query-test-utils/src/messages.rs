use grpc_base_query::MethodDescriptor;

#[derive(Clone, PartialEq, prost::Message)]
pub struct User {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub name: String,
}

impl User {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetUserRequest {
    #[prost(int32, tag = "1")]
    pub id: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListUsersRequest {
    #[prost(int32, tag = "1")]
    pub page_size: i32,
}

pub const GET_USER: MethodDescriptor<GetUserRequest, User> =
    MethodDescriptor::unary("users.UserService", "GetUser");

pub const LIST_USERS: MethodDescriptor<ListUsersRequest, User> =
    MethodDescriptor::server_streaming("users.UserService", "ListUsers");

pub const UPLOAD_USERS: MethodDescriptor<User, User> =
    MethodDescriptor::client_streaming("users.UserService", "UploadUsers");
