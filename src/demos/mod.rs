//! Demo route handlers
//!
//! Each submodule owns the data of one demo page: its loader resolves read
//! requests, its action (if any) applies mutations. Mutable collections live
//! in stores with a narrow operation interface; static tables are immutable.

pub mod catalog;
pub mod faults;
pub mod outcome;
pub mod overview;
pub mod repos;
pub mod server_actions;
pub mod streaming;
pub mod todos;
pub mod users;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use crate::config::DemosConfig;
use crate::http::FormData;
use crate::routing::Params;

pub use outcome::Outcome;
pub use repos::{GitHubSource, RepositorySource};

/// Inputs available to a loader or action
#[derive(Debug, Clone, Copy)]
pub struct RouteArgs<'a> {
    pub params: &'a Params,
    pub query: &'a FormData,
}

impl<'a> RouteArgs<'a> {
    pub const fn new(params: &'a Params, query: &'a FormData) -> Self {
        Self { params, query }
    }

    /// Path parameter captured by a dynamic segment
    pub fn param(&self, name: &str) -> &'a str {
        self.params.get(name).map_or("", String::as_str)
    }
}

/// Artificial latency, standing in for database and API round trips
#[derive(Debug, Clone, Copy)]
pub struct Latency {
    enabled: bool,
}

impl Latency {
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub async fn pause(self, millis: u64) {
        if self.enabled {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

/// ISO-8601 timestamp with millisecond precision, UTC
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Lock a store; every critical section leaves its collection consistent,
/// so a poisoned lock is still safe to use.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-lifetime state of all demos
pub struct Demos {
    pub latency: Latency,
    pub todos: todos::TodoStore,
    pub counter: server_actions::Counter,
    pub messages: server_actions::MessageBoard,
    pub subscribers: server_actions::Subscribers,
    pub starred: repos::StarredRepos,
    pub repositories: Arc<dyn RepositorySource>,
}

impl Demos {
    pub fn new(config: &DemosConfig, repositories: Arc<dyn RepositorySource>) -> Self {
        Self {
            latency: Latency::new(config.simulate_latency),
            todos: todos::TodoStore::seeded(),
            counter: server_actions::Counter::default(),
            messages: server_actions::MessageBoard::default(),
            subscribers: server_actions::Subscribers::default(),
            starred: repos::StarredRepos::default(),
            repositories,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_demos() -> Demos {
    Demos::new(
        &crate::config::test_config().demos,
        Arc::new(repos::tests::StaticSource::sample()),
    )
}
