pub mod activation;
pub mod cli;
pub mod coordinator;
pub mod dom;
pub mod error;
pub mod hiding;
pub mod page;
pub mod selector;
pub mod store;
pub mod trace;

use crate::coordinator::background::Background;
use crate::coordinator::host::TabHost;
use crate::store::store::ElementStore;
use crate::trace::logger::TraceLogger;

/// Build a fully wired host over a store file: the background process,
/// the tab registry, and JSONL tracing. Pages are then opened per tab
/// with `TabHost::open_page`.
pub fn open_host(store_path: &str, trace_path: Option<&str>) -> TabHost {
    let store = ElementStore::open(store_path);
    let tracer = match trace_path {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    TabHost::with_tracer(Background::new(store), tracer)
}

/// In-memory host for tests and embedding without persistence.
pub fn open_host_in_memory() -> TabHost {
    TabHost::new(Background::new(ElementStore::in_memory()))
}
