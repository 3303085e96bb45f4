//! HTTP protocol layer module
//!
//! Response builders shared by every route.

pub mod response;

// Re-export commonly used functions
pub use response::{build_options_response, json_response, strip_body};
