//! Request handler module
//!
//! Responsible for request routing dispatch and the classify endpoint.

pub mod classify;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
