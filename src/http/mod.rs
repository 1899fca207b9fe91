//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the request handlers:
//! isolation header injection, MIME detection, range parsing,
//! conditional requests, and response builders.

pub mod cache;
pub mod isolation;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_403_response, build_404_response, build_405_response,
    build_416_response, build_options_response, build_redirect_response,
};
