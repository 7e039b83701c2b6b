//! Shared support for harness integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use pagecheck_harness::{Page, SchedulerHandle};

/// Initialize tracing output for test runs, honoring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Minimal socket-echo test double.
///
/// Stands in for the WebSocket side of socket fixtures: a sent message is
/// delivered back to the `on_message` callback asynchronously, as an event
/// task on the page's worker thread. Once the page is torn down, deliveries
/// vanish like every other stale callback.
pub struct EchoSocket {
    handle: SchedulerHandle,
    on_message: Arc<dyn Fn(String) + Send + Sync>,
}

impl EchoSocket {
    /// Attaches an echo socket to a page.
    pub fn connect(page: &Page, on_message: impl Fn(String) + Send + Sync + 'static) -> Self {
        Self {
            handle: page.scheduler_handle(),
            on_message: Arc::new(on_message),
        }
    }

    /// Sends a message; the echoed copy arrives asynchronously.
    pub fn send(&self, message: &str) {
        let callback = Arc::clone(&self.on_message);
        let echoed = message.to_string();
        self.handle
            .schedule_event(Box::new(move || callback(echoed.clone())));
    }
}
