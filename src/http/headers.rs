//! Fixed response header set
//!
//! Every response the server produces, success or error, carries these six
//! headers: permissive CORS for cross-origin loads, COEP/COOP to make the
//! page cross-origin isolated (SharedArrayBuffer requires both), and cache
//! suppression so edits show up on reload.

use hyper::header::{HeaderName, HeaderValue};
use hyper::HeaderMap;

pub const INJECTED_HEADERS: [(&str, &str); 6] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "*"),
    ("cross-origin-embedder-policy", "require-corp"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cache-control", "no-cache"),
];

/// Inject the fixed header set into a response header map.
///
/// Runs after the handler has built the response and before it is flushed,
/// so the set is present on every status code. `insert` keeps the keys
/// unique if a handler already set one of them.
pub fn inject(headers: &mut HeaderMap) {
    for (name, value) in INJECTED_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}
