//! Cross-origin isolation header injection
//!
//! Browsers only allow `SharedArrayBuffer` and WASM shared-memory threads
//! on cross-origin isolated pages, which requires two response headers:
//!
//! ```text
//! Cross-Origin-Embedder-Policy: require-corp
//! Cross-Origin-Opener-Policy: same-origin
//! ```
//!
//! This module is the single interception point where both headers are
//! added. Every response the server produces (200, 206, 301, 304, 4xx)
//! passes through [`apply`] before it is handed back to hyper.

use hyper::header::{HeaderName, HeaderValue};
use hyper::Response;

/// Header name for the embedder policy.
pub const EMBEDDER_POLICY: &str = "cross-origin-embedder-policy";
/// Required embedder policy value.
pub const EMBEDDER_POLICY_VALUE: &str = "require-corp";
/// Header name for the opener policy.
pub const OPENER_POLICY: &str = "cross-origin-opener-policy";
/// Required opener policy value.
pub const OPENER_POLICY_VALUE: &str = "same-origin";

/// Add the two isolation headers to a finished response.
///
/// Only the header map is touched: status, body and every other header
/// stay exactly as the handler built them, so a 404 stays a 404 with the
/// isolation headers on top. Existing values for the two headers are
/// replaced, never duplicated.
pub fn apply<B>(mut response: Response<B>) -> Response<B> {
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static(EMBEDDER_POLICY),
        HeaderValue::from_static(EMBEDDER_POLICY_VALUE),
    );
    headers.insert(
        HeaderName::from_static(OPENER_POLICY),
        HeaderValue::from_static(OPENER_POLICY_VALUE),
    );
    response
}
