//! Static route tree
//!
//! Mirrors the demo application's route configuration: pathless layouts wrap
//! groups of routes, index routes match their parent's path exactly, and
//! `:name` segments capture path parameters.

/// Identifier of every route in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    Home,
    DemosLayout,
    DemosIndex,
    Loader,
    Action,
    Client,
    Error,
    RscActions,
    RscPromises,
    NestedLayout,
    NestedIndex,
    Category,
    Item,
}

impl RouteId {
    /// Route module id, as reported in match documents and logs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "routes/home",
            Self::DemosLayout => "routes/demos/layout",
            Self::DemosIndex => "routes/demos/index",
            Self::Loader => "routes/demos/loader",
            Self::Action => "routes/demos/action",
            Self::Client => "routes/demos/client",
            Self::Error => "routes/demos/error",
            Self::RscActions => "routes/demos/rsc-actions",
            Self::RscPromises => "routes/demos/rsc-promises",
            Self::NestedLayout => "routes/demos/nested/layout",
            Self::NestedIndex => "routes/demos/nested/index",
            Self::Category => "routes/demos/nested/category",
            Self::Item => "routes/demos/nested/item",
        }
    }
}

impl std::fmt::Display for RouteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a node consumes the URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Contributes no segments; matches when a child matches
    Layout,
    /// Matches when no segments remain
    Index,
    /// Consumes the given `/`-separated segments
    Path(&'static str),
}

/// One node of the route tree
#[derive(Debug)]
pub struct RouteNode {
    pub id: RouteId,
    pub kind: RouteKind,
    pub children: &'static [RouteNode],
}

const fn layout(id: RouteId, children: &'static [RouteNode]) -> RouteNode {
    RouteNode {
        id,
        kind: RouteKind::Layout,
        children,
    }
}

const fn index(id: RouteId) -> RouteNode {
    RouteNode {
        id,
        kind: RouteKind::Index,
        children: NO_CHILDREN,
    }
}

const fn route(path: &'static str, id: RouteId, children: &'static [RouteNode]) -> RouteNode {
    RouteNode {
        id,
        kind: RouteKind::Path(path),
        children,
    }
}

const NO_CHILDREN: &[RouteNode] = &[];

const ITEM_ROUTES: &[RouteNode] = &[route(":itemId", RouteId::Item, NO_CHILDREN)];

const NESTED_ROUTES: &[RouteNode] = &[
    route("demos/nested", RouteId::NestedIndex, NO_CHILDREN),
    route("demos/nested/:categoryId", RouteId::Category, ITEM_ROUTES),
];

const DEMO_ROUTES: &[RouteNode] = &[
    route("demos", RouteId::DemosIndex, NO_CHILDREN),
    route("demos/loader", RouteId::Loader, NO_CHILDREN),
    route("demos/action", RouteId::Action, NO_CHILDREN),
    route("demos/client", RouteId::Client, NO_CHILDREN),
    route("demos/error", RouteId::Error, NO_CHILDREN),
    route("demos/rsc-actions", RouteId::RscActions, NO_CHILDREN),
    route("demos/rsc-promises", RouteId::RscPromises, NO_CHILDREN),
    layout(RouteId::NestedLayout, NESTED_ROUTES),
];

/// Top-level routes, tried in order. Static siblings precede dynamic ones.
pub static ROUTES: &[RouteNode] = &[
    index(RouteId::Home),
    layout(RouteId::DemosLayout, DEMO_ROUTES),
];
