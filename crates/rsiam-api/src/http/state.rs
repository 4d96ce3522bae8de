//! Application state for HTTP handlers.

use std::sync::Arc;

use rsiam_storage::PolicyStore;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The policy store backing every operation.
    pub store: Arc<PolicyStore>,
    /// Whether decisions are traced (logged and emitted to the sink).
    pub trace: bool,
}

impl AppState {
    /// Creates state with tracing disabled.
    pub fn new(store: Arc<PolicyStore>) -> Self {
        Self {
            store,
            trace: false,
        }
    }

    /// Enables decision tracing for all requests.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
