//! Client data demo: GitHub repository search and starred list
//!
//! The loader queries the public search API through a blocking `ureq` agent
//! on tokio's blocking pool. The action toggles a repository in the starred
//! set.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;

use super::{lock, timestamp, Demos, Outcome, RouteArgs};
use crate::config::DemosConfig;
use crate::error::DemoError;
use crate::http::FormData;
use crate::logger;

/// Query used when the visitor did not type one
pub const DEFAULT_QUERY: &str = "react";

const PER_PAGE: u32 = 10;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<Repository>,
}

/// Anything that can answer a repository search. Implementations block.
pub trait RepositorySource: Send + Sync {
    fn search(&self, query: &str) -> Result<SearchPage, DemoError>;
}

/// Search backed by the GitHub REST API
pub struct GitHubSource {
    agent: Agent,
    base_url: String,
}

impl GitHubSource {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &DemosConfig) -> Self {
        Self::new(
            &config.github_api_url,
            Duration::from_secs(config.github_timeout_secs),
        )
    }

    fn search_url(&self, query: &str) -> String {
        let params = [("q", query), ("per_page", &PER_PAGE.to_string())];
        let encoded = serde_urlencoded::to_string(params).unwrap_or_default();
        format!("{}/search/repositories?{encoded}", self.base_url)
    }
}

fn fetch_failed() -> DemoError {
    DemoError::unexpected("Failed to fetch repositories")
}

impl RepositorySource for GitHubSource {
    fn search(&self, query: &str) -> Result<SearchPage, DemoError> {
        let url = self.search_url(query);
        logger::log_debug(&format!("Repository search: {url}"));

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| {
                logger::log_warning(&format!("Repository search failed: {e}"));
                fetch_failed()
            })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            logger::log_warning(&format!("Repository search answered {status}"));
            return Err(fetch_failed());
        }

        response.into_body().read_json().map_err(|e| {
            logger::log_warning(&format!("Repository search returned bad JSON: {e}"));
            fetch_failed()
        })
    }
}

/// Repository URLs the visitor saved
#[derive(Debug, Default)]
pub struct StarredRepos {
    urls: Mutex<BTreeSet<String>>,
}

impl StarredRepos {
    /// Flip membership of `url`; returns whether it is now starred
    pub fn toggle(&self, url: &str) -> bool {
        let mut urls = lock(&self.urls);
        if urls.remove(url) {
            false
        } else {
            urls.insert(url.to_string());
            true
        }
    }

    pub fn list(&self) -> Vec<String> {
        lock(&self.urls).iter().cloned().collect()
    }
}

#[derive(Debug, Serialize)]
pub struct ClientPage {
    pub repositories: Vec<Repository>,
    pub total_count: u64,
    pub query: String,
    pub loaded_at: String,
    pub starred: Vec<String>,
}

pub async fn loader(demos: &Demos, args: RouteArgs<'_>) -> Result<ClientPage, DemoError> {
    demos.latency.pause(300).await;

    let query = args.query.get_or_empty("q").to_string();
    let effective = if query.is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        query.clone()
    };

    let source = Arc::clone(&demos.repositories);
    let page = tokio::task::spawn_blocking(move || source.search(&effective))
        .await
        .map_err(|e| DemoError::unexpected(format!("Repository search task failed: {e}")))??;

    Ok(ClientPage {
        repositories: page.items,
        total_count: page.total_count,
        query,
        loaded_at: timestamp(),
        starred: demos.starred.list(),
    })
}

#[allow(clippy::unused_async)]
pub async fn action(demos: &Demos, form: &FormData) -> Result<Outcome, DemoError> {
    let repo = form.get_or_empty("repo").trim();
    if repo.is_empty() {
        return Ok(Outcome::rejected("star", "Repository is required"));
    }
    let operation = if demos.starred.toggle(repo) {
        "starred"
    } else {
        "unstarred"
    };
    Ok(Outcome::applied(operation).with("repo", repo))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::demos::test_demos;
    use crate::routing::Params;

    /// Canned results; records the last query it saw
    pub struct StaticSource {
        page: SearchPage,
        pub last_query: Mutex<Option<String>>,
    }

    impl StaticSource {
        pub fn sample() -> Self {
            let repo = |id: u64, name: &str| Repository {
                id,
                full_name: name.to_string(),
                html_url: format!("https://github.com/{name}"),
                description: None,
                language: Some("TypeScript".to_string()),
                stargazers_count: id * 100,
                forks_count: id,
            };
            Self {
                page: SearchPage {
                    total_count: 2,
                    items: vec![repo(1, "facebook/react"), repo(2, "remix-run/react-router")],
                },
                last_query: Mutex::new(None),
            }
        }
    }

    impl RepositorySource for StaticSource {
        fn search(&self, query: &str) -> Result<SearchPage, DemoError> {
            *lock(&self.last_query) = Some(query.to_string());
            Ok(self.page.clone())
        }
    }

    struct FailingSource;

    impl RepositorySource for FailingSource {
        fn search(&self, _query: &str) -> Result<SearchPage, DemoError> {
            Err(fetch_failed())
        }
    }

    #[test]
    fn test_toggle_twice_unstars() {
        let starred = StarredRepos::default();
        assert!(starred.toggle("https://github.com/a/b"));
        assert_eq!(starred.list(), vec!["https://github.com/a/b".to_string()]);
        assert!(!starred.toggle("https://github.com/a/b"));
        assert!(starred.list().is_empty());
    }

    #[test]
    fn test_search_url_encodes_query() {
        let source = GitHubSource::new("https://api.github.com/", Duration::from_secs(1));
        assert_eq!(
            source.search_url("react router"),
            "https://api.github.com/search/repositories?q=react+router&per_page=10"
        );
    }

    #[test]
    fn test_search_page_tolerates_missing_fields() {
        let page: SearchPage = serde_json::from_str(
            r#"{"items":[{"id":7,"full_name":"a/b","html_url":"https://github.com/a/b"}]}"#,
        )
        .unwrap();
        assert_eq!(page.total_count, 0);
        assert_eq!(page.items[0].stargazers_count, 0);
        assert_eq!(page.items[0].description, None);
    }

    #[test]
    fn test_unreachable_api_is_unexpected() {
        let source = GitHubSource::new("http://127.0.0.1:9", Duration::from_secs(2));
        let err = source.search("react").unwrap_err();
        assert!(!err.is_expected());
        assert_eq!(err.to_string(), "Failed to fetch repositories");
    }

    #[tokio::test]
    async fn test_loader_defaults_query() {
        let source = Arc::new(StaticSource::sample());
        let mut demos = test_demos();
        demos.repositories = source.clone();

        let params = Params::new();
        let query = FormData::default();
        let page = loader(&demos, RouteArgs::new(&params, &query)).await.unwrap();
        assert_eq!(page.query, "");
        assert_eq!(page.total_count, 2);
        assert_eq!(page.repositories.len(), 2);
        assert_eq!(lock(&source.last_query).as_deref(), Some(DEFAULT_QUERY));
    }

    #[tokio::test]
    async fn test_loader_propagates_failure() {
        let mut demos = test_demos();
        demos.repositories = Arc::new(FailingSource);

        let params = Params::new();
        let query = FormData::from_query(Some("q=rust"));
        let err = loader(&demos, RouteArgs::new(&params, &query)).await.unwrap_err();
        assert_eq!(err.status_code().as_u16(), 500);
    }

    #[tokio::test]
    async fn test_action_toggles() {
        let demos = test_demos();
        let form: FormData = [("repo", "https://github.com/facebook/react")]
            .into_iter()
            .collect();

        let first = action(&demos, &form).await.unwrap();
        assert_eq!(first.operation, "starred");
        let second = action(&demos, &form).await.unwrap();
        assert_eq!(second.operation, "unstarred");
        assert!(demos.starred.list().is_empty());

        let empty = action(&demos, &FormData::default()).await.unwrap();
        assert!(!empty.ok);
    }
}
