//! HTTP protocol layer module
//!
//! Response builders and request payload decoding, decoupled from the demo handlers.

pub mod form;
pub mod response;

// Re-export commonly used types
pub use form::FormData;
pub use response::{
    build_405_response, build_413_response, build_error_response, build_health_response,
    build_options_response, decorate, json_response,
};
