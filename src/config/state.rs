// Application state module
// Holds the loaded configuration next to the demo stores

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::types::Config;
use crate::demos::{Demos, GitHubSource, RepositorySource};
use crate::logger::AccessFormat;

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
    /// `logging.access_log_format`, parsed once at startup
    pub access_format: AccessFormat,

    pub demos: Demos,
}

impl AppState {
    /// Build state with the live GitHub repository source
    pub fn new(config: &Config) -> Self {
        let source = Arc::new(GitHubSource::from_config(&config.demos));
        Self::with_repositories(config, source)
    }

    pub fn with_repositories(config: &Config, repositories: Arc<dyn RepositorySource>) -> Self {
        Self {
            config: config.clone(),
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
            access_format: AccessFormat::parse(&config.logging.access_log_format),
            demos: Demos::new(&config.demos, repositories),
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.cached_access_log.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    AppState::with_repositories(
        &super::test_config(),
        Arc::new(crate::demos::repos::tests::StaticSource::sample()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_format_cached_from_config() {
        let mut config = super::super::test_config();
        config.logging.access_log_format = "$status $route".to_string();
        let state = AppState::with_repositories(
            &config,
            Arc::new(crate::demos::repos::tests::StaticSource::sample()),
        );
        assert_eq!(
            state.access_format,
            AccessFormat::Pattern("$status $route".to_string())
        );
        assert_eq!(test_state().access_format, AccessFormat::Combined);
    }
}
