//! Home page, demos navigation and demo catalog

use serde::Serialize;

use super::RouteArgs;
use crate::error::DemoError;

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub path: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NavSection {
    pub label: &'static str,
    pub items: &'static [NavLink],
}

const fn link(path: &'static str, label: &'static str) -> NavLink {
    NavLink { path, label }
}

pub static NAVIGATION: &[NavSection] = &[
    NavSection {
        label: "Overview",
        items: &[link("/demos", "All Demos")],
    },
    NavSection {
        label: "React Router",
        items: &[
            link("/demos/loader", "Server Loader"),
            link("/demos/action", "Server Action (Form)"),
            link("/demos/client", "Client-Only (non-RSC)"),
            link("/demos/nested", "Nested Routes"),
            link("/demos/error", "Error Boundary"),
        ],
    },
    NavSection {
        label: "React Server Components",
        items: &[
            link("/demos/rsc-actions", "Server Actions"),
            link("/demos/rsc-promises", "Promise Streaming"),
        ],
    },
];

#[derive(Debug, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
    pub path: &'static str,
}

pub static ROUTER_FEATURES: &[Feature] = &[
    Feature {
        title: "Server Loader",
        description: "Fetch data on the server before rendering. Data is serialized and passed to components.",
        path: "/demos/loader",
    },
    Feature {
        title: "Server Action (Form)",
        description: "Handle form submissions with server-side actions. Automatic revalidation after mutations.",
        path: "/demos/action",
    },
    Feature {
        title: "Client-Only (non-RSC)",
        description: "Routes that run entirely in the browser using clientLoader and clientAction.",
        path: "/demos/client",
    },
    Feature {
        title: "Nested Routes",
        description: "Build complex layouts with nested routes and dynamic parameters.",
        path: "/demos/nested",
    },
    Feature {
        title: "Error Boundary",
        description: "Gracefully handle errors with route-level error boundaries.",
        path: "/demos/error",
    },
];

pub static RSC_FEATURES: &[Feature] = &[
    Feature {
        title: "Server Actions",
        description: "Functions marked with \"use server\" that run on the server. useTransition, useOptimistic, and more.",
        path: "/demos/rsc-actions",
    },
    Feature {
        title: "Promise Streaming",
        description: "Pass promises from Server to Client Components. Use the use() hook to unwrap them with Suspense.",
        path: "/demos/rsc-promises",
    },
];

#[derive(Debug, Serialize)]
pub struct Home {
    pub name: &'static str,
    pub version: &'static str,
    pub demos: &'static str,
}

#[allow(clippy::unused_async)]
pub async fn home_loader() -> Result<Home, DemoError> {
    Ok(Home {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        demos: "/demos",
    })
}

#[derive(Debug, Serialize)]
pub struct DemosNav {
    pub sections: &'static [NavSection],
    /// Navigation entry matching the requested path, if any
    pub active: Option<&'static str>,
}

#[allow(clippy::unused_async)]
pub async fn layout_loader(path: &str) -> Result<DemosNav, DemoError> {
    let path = path.trim_end_matches('/');
    let active = NAVIGATION
        .iter()
        .flat_map(|section| section.items)
        .filter(|item| path == item.path || path.starts_with(&format!("{}/", item.path)))
        .map(|item| item.path)
        .max_by_key(|p| p.len());
    Ok(DemosNav {
        sections: NAVIGATION,
        active,
    })
}

#[derive(Debug, Serialize)]
pub struct DemoCatalog {
    pub router_features: &'static [Feature],
    pub rsc_features: &'static [Feature],
}

#[allow(clippy::unused_async)]
pub async fn index_loader(_args: RouteArgs<'_>) -> Result<DemoCatalog, DemoError> {
    Ok(DemoCatalog {
        router_features: ROUTER_FEATURES,
        rsc_features: RSC_FEATURES,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_active_link() {
        let nav = layout_loader("/demos/nested/books/fiction").await.unwrap();
        assert_eq!(nav.active, Some("/demos/nested"));

        let nav = layout_loader("/demos/").await.unwrap();
        assert_eq!(nav.active, Some("/demos"));

        let nav = layout_loader("/demos/loader").await.unwrap();
        assert_eq!(nav.active, Some("/demos/loader"));
    }

    #[test]
    fn test_every_feature_is_navigable() {
        let links: Vec<&str> = NAVIGATION
            .iter()
            .flat_map(|s| s.items)
            .map(|l| l.path)
            .collect();
        for feature in ROUTER_FEATURES.iter().chain(RSC_FEATURES) {
            assert!(links.contains(&feature.path), "{}", feature.path);
        }
    }
}
