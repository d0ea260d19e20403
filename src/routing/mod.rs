//! Routing module
//!
//! Provides the static route tree of the demo application and the matcher
//! that resolves a URL path into its chain of layouts and leaf route.

mod matcher;
mod table;

pub use matcher::{match_path, MatchChain, Params};
pub use table::RouteId;
