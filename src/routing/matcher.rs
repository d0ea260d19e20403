//! Route matching module
//!
//! Resolves a URL path against the route tree into the chain of routes that
//! render it, outermost layout first, together with the captured parameters.

use std::collections::BTreeMap;

use super::table::{RouteId, RouteKind, RouteNode, ROUTES};

/// Path parameters captured by dynamic segments
pub type Params = BTreeMap<String, String>;

/// Result of matching a path against the route tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchChain {
    /// Matched routes, outermost first
    pub routes: Vec<RouteId>,
    pub params: Params,
}

impl MatchChain {
    /// Deepest matched route; the one whose action handles a submission
    pub fn leaf(&self) -> Option<RouteId> {
        self.routes.last().copied()
    }
}

/// Match `path` against the application route tree
pub fn match_path(path: &str) -> Option<MatchChain> {
    match_routes(ROUTES, path)
}

/// Match `path` against an arbitrary route tree
pub fn match_routes(routes: &[RouteNode], path: &str) -> Option<MatchChain> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut chain = MatchChain {
        routes: Vec::new(),
        params: Params::new(),
    };
    match_nodes(routes, &segments, &mut chain).then_some(chain)
}

/// Try sibling nodes in order; on failure the chain is left as it was
fn match_nodes(nodes: &[RouteNode], segments: &[&str], chain: &mut MatchChain) -> bool {
    for node in nodes {
        let depth = chain.routes.len();
        let params = chain.params.clone();
        if match_node(node, segments, chain) {
            return true;
        }
        chain.routes.truncate(depth);
        chain.params = params;
    }
    false
}

fn match_node(node: &RouteNode, segments: &[&str], chain: &mut MatchChain) -> bool {
    match node.kind {
        RouteKind::Layout => {
            chain.routes.push(node.id);
            match_nodes(node.children, segments, chain)
        }
        RouteKind::Index => {
            if segments.is_empty() {
                chain.routes.push(node.id);
                true
            } else {
                false
            }
        }
        RouteKind::Path(pattern) => {
            let Some(rest) = consume(pattern, segments, &mut chain.params) else {
                return false;
            };
            chain.routes.push(node.id);
            match_nodes(node.children, rest, chain) || rest.is_empty()
        }
    }
}

/// Consume the segments `pattern` describes, returning what is left
fn consume<'a>(pattern: &str, segments: &'a [&'a str], params: &mut Params) -> Option<&'a [&'a str]> {
    let mut consumed = 0;
    for expected in pattern.split('/').filter(|s| !s.is_empty()) {
        let actual = segments.get(consumed)?;
        if let Some(name) = expected.strip_prefix(':') {
            params.insert(name.to_string(), (*actual).to_string());
        } else if !expected.eq_ignore_ascii_case(actual) {
            return None;
        }
        consumed += 1;
    }
    Some(&segments[consumed..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home() {
        let chain = match_path("/").unwrap();
        assert_eq!(chain.routes, vec![RouteId::Home]);
        assert!(chain.params.is_empty());
    }

    #[test]
    fn test_static_demo_route() {
        let chain = match_path("/demos/loader").unwrap();
        assert_eq!(chain.routes, vec![RouteId::DemosLayout, RouteId::Loader]);
        assert_eq!(chain.leaf(), Some(RouteId::Loader));
    }

    #[test]
    fn test_demos_index() {
        let chain = match_path("/demos").unwrap();
        assert_eq!(chain.routes, vec![RouteId::DemosLayout, RouteId::DemosIndex]);
    }

    #[test]
    fn test_nested_chain_with_params() {
        let chain = match_path("/demos/nested/books/fiction").unwrap();
        assert_eq!(
            chain.routes,
            vec![
                RouteId::DemosLayout,
                RouteId::NestedLayout,
                RouteId::Category,
                RouteId::Item
            ]
        );
        assert_eq!(chain.params.get("categoryId").map(String::as_str), Some("books"));
        assert_eq!(chain.params.get("itemId").map(String::as_str), Some("fiction"));
    }

    #[test]
    fn test_category_without_item() {
        let chain = match_path("/demos/nested/electronics").unwrap();
        assert_eq!(chain.leaf(), Some(RouteId::Category));
        assert!(!chain.params.contains_key("itemId"));
    }

    #[test]
    fn test_nested_index() {
        let chain = match_path("/demos/nested").unwrap();
        assert_eq!(
            chain.routes,
            vec![RouteId::DemosLayout, RouteId::NestedLayout, RouteId::NestedIndex]
        );
    }

    #[test]
    fn test_unknown_category_still_matches() {
        // Lookup failures belong to the category loader, not the matcher
        let chain = match_path("/demos/nested/toys").unwrap();
        assert_eq!(chain.leaf(), Some(RouteId::Category));
        assert_eq!(chain.params.get("categoryId").map(String::as_str), Some("toys"));
    }

    #[test]
    fn test_trailing_slash_ignored() {
        assert_eq!(match_path("/demos/action/"), match_path("/demos/action"));
    }

    #[test]
    fn test_static_segments_case_insensitive() {
        let chain = match_path("/Demos/RSC-Actions").unwrap();
        assert_eq!(chain.leaf(), Some(RouteId::RscActions));
    }

    #[test]
    fn test_no_match() {
        assert!(match_path("/demos/unknown").is_none());
        assert!(match_path("/elsewhere").is_none());
        assert!(match_path("/demos/nested/books/fiction/extra").is_none());
    }

    #[test]
    fn test_failed_branch_leaves_no_params() {
        static TREE: &[RouteNode] = &[
            RouteNode {
                id: RouteId::Category,
                kind: RouteKind::Path("shop/:categoryId/exact"),
                children: &[],
            },
            RouteNode {
                id: RouteId::Loader,
                kind: RouteKind::Path("shop/:other"),
                children: &[],
            },
        ];
        let chain = match_routes(TREE, "/shop/books").unwrap();
        assert_eq!(chain.routes, vec![RouteId::Loader]);
        assert!(!chain.params.contains_key("categoryId"));
        assert_eq!(chain.params.get("other").map(String::as_str), Some("books"));
    }
}
