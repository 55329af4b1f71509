//! Implements a struct that holds the state of the server.

use std::sync::Arc;

use crate::summary::Summary;

/// The state of the server.
///
/// The summary is computed once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The summary to display.
    pub summary: Arc<Summary>,
}

impl AppState {
    /// Create a new [AppState] that serves `summary`.
    pub fn new(summary: Summary) -> Self {
        Self {
            summary: Arc::new(summary),
        }
    }
}
