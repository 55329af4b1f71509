//! The endpoint URIs.

/// The summary page.
pub const ROOT: &str = "/";
