//! API constants
//!
//! Every route is served under [`API_PREFIX`]; there is no versioned prefix.

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Build an API path from a route suffix, e.g. `api_path("/images")` is `/api/images`.
pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}
