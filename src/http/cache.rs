//! Conditional request support
//!
//! `ETag` generation and `If-None-Match` evaluation. The server is a
//! development aid, so responses carry `Cache-Control: no-cache`: browsers
//! revalidate on every load and pick up fresh build output, while 304s keep
//! revalidation cheap for large `.wasm` and `.data` files.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Cache-Control value applied to file responses.
pub const CACHE_CONTROL: &str = "no-cache";

/// Compute a quoted `ETag` for file content.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Evaluate a client `If-None-Match` header against the computed `ETag`.
///
/// Handles comma-separated lists and the `*` wildcard. Returns true when
/// the client copy is current and a 304 should be sent.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|candidates| {
        candidates
            .split(',')
            .any(|candidate| candidate.trim() == etag || candidate.trim() == "*")
    })
}
