//! Request handler module
//!
//! Routes every request through the static file handler and applies the
//! cross-origin isolation headers to every response on the way out.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
