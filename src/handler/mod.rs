//! Request handler module
//!
//! Routes requests through the route tree and dispatches them to the demo
//! loaders and actions.

mod dispatch;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
