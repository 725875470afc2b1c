use grpc_base_query::{GrpcBaseQuery, GrpcBaseQueryConfig, grpc_base_query};
use grpc_base_query_test_utils::MockTransport;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::Mutex;
use std::thread::{self, ThreadId};

/// Keeps every record together with the thread that emitted it, so tests
/// running in parallel only look at their own output.
struct CapturingLogger {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((
                thread::current().id(),
                record.level(),
                record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {}
}

fn install() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);
}

fn warnings_on_this_thread() -> Vec<String> {
    let current = thread::current().id();
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(thread, level, _)| *thread == current && *level == Level::Warn)
        .map(|(_, _, message)| message.clone())
        .collect()
}

#[test]
fn test_missing_host_warns_once() {
    install();

    let base_query = grpc_base_query(GrpcBaseQueryConfig::default());
    assert_eq!(base_query.host(), None);

    let warnings = warnings_on_this_thread();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("No gRPC-Web host configured"));
}

#[test]
fn test_blank_host_warns_once() {
    install();

    let _base_query = GrpcBaseQuery::with_transport(
        GrpcBaseQueryConfig::new("   "),
        MockTransport::new(),
    );

    assert_eq!(warnings_on_this_thread().len(), 1);
}

#[test]
fn test_configured_host_does_not_warn() {
    install();

    let base_query = grpc_base_query(GrpcBaseQueryConfig::new("http://localhost:8080"));
    assert_eq!(base_query.host(), Some("http://localhost:8080"));

    let _clone = base_query.clone();
    assert!(warnings_on_this_thread().is_empty());
}
