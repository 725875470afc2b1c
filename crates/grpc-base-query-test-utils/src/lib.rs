//! Shared fixtures for exercising `grpc-base-query`: a scripted transport
//! that needs no network, and a local gRPC-Web server for the real one.

pub mod messages;
pub mod server;
pub mod transport;

pub use messages::{GET_USER, GetUserRequest, LIST_USERS, ListUsersRequest, UPLOAD_USERS, User};
pub use server::serve_users;
pub use transport::{MockReply, MockTransport, RecordedCall};

/// Route `log` output through the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
