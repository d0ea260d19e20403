//! Server loader demo: user search
//!
//! A free-text query filters a static user table.

use serde::Serialize;

use super::{timestamp, Demos, RouteArgs};
use crate::error::DemoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Admin,
    Editor,
    User,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u32,
    pub name: &'static str,
    pub email: &'static str,
    pub role: Role,
}

pub static USERS: &[User] = &[
    User {
        id: 1,
        name: "Alice Johnson",
        email: "alice@example.com",
        role: Role::Admin,
    },
    User {
        id: 2,
        name: "Bob Smith",
        email: "bob@example.com",
        role: Role::User,
    },
    User {
        id: 3,
        name: "Carol Williams",
        email: "carol@example.com",
        role: Role::Editor,
    },
    User {
        id: 4,
        name: "David Brown",
        email: "david@example.com",
        role: Role::User,
    },
    User {
        id: 5,
        name: "Eva Martinez",
        email: "eva@example.com",
        role: Role::Admin,
    },
];

/// Users whose name or email contains `query`, ignoring case.
/// An empty query returns the whole table in order.
pub fn search(query: &str) -> Vec<&'static User> {
    let needle = query.to_lowercase();
    USERS
        .iter()
        .filter(|u| {
            needle.is_empty()
                || u.name.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub version: &'static str,
    pub platform: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UserSearch {
    pub users: Vec<&'static User>,
    pub search_query: String,
    pub loaded_at: String,
    pub server_info: ServerInfo,
}

pub async fn loader(demos: &Demos, args: RouteArgs<'_>) -> Result<UserSearch, DemoError> {
    demos.latency.pause(100).await;

    let search_query = args.query.get_or_empty("q").to_string();
    Ok(UserSearch {
        users: search(&search_query),
        search_query,
        loaded_at: timestamp(),
        server_info: ServerInfo {
            version: env!("CARGO_PKG_VERSION"),
            platform: std::env::consts::OS,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FormData;
    use crate::routing::Params;

    fn names(users: &[&User]) -> Vec<&'static str> {
        users.iter().map(|u| u.name).collect()
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let all = search("");
        assert_eq!(all.len(), USERS.len());
        assert_eq!(all.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_matches_name_case_insensitive() {
        assert_eq!(names(&search("ALICE")), vec!["Alice Johnson"]);
        assert_eq!(names(&search("br")), vec!["David Brown"]);
    }

    #[test]
    fn test_matches_email() {
        assert_eq!(names(&search("eva@")), vec!["Eva Martinez"]);
        assert_eq!(search("example.com").len(), 5);
    }

    #[test]
    fn test_result_is_exact_subset() {
        for query in ["a", "o", "smith", "zzz", "@EXAMPLE"] {
            let needle = query.to_lowercase();
            let expected: Vec<&User> = USERS
                .iter()
                .filter(|u| {
                    u.name.to_lowercase().contains(&needle)
                        || u.email.to_lowercase().contains(&needle)
                })
                .collect();
            assert_eq!(search(query), expected, "query {query:?}");
        }
        assert!(search("zzz").is_empty());
    }

    #[tokio::test]
    async fn test_loader_echoes_query() {
        let demos = crate::demos::test_demos();
        let params = Params::new();
        let query = FormData::from_query(Some("q=bob"));
        let result = loader(&demos, RouteArgs::new(&params, &query)).await.unwrap();
        assert_eq!(result.search_query, "bob");
        assert_eq!(names(&result.users), vec!["Bob Smith"]);
        assert!(!result.loaded_at.is_empty());
    }
}
