//! Route dispatch
//!
//! Binds every route id to its loader and, where one exists, its action.
//! Results are flattened to JSON values so the router can assemble match
//! documents without knowing the per-route data types.

use serde::Serialize;
use serde_json::Value;

use crate::demos::{
    catalog, faults, overview, repos, server_actions, streaming, todos, users, Demos, Outcome,
    RouteArgs,
};
use crate::error::DemoError;
use crate::http::FormData;
use crate::logger;
use crate::routing::RouteId;

fn to_json<T: Serialize>(result: Result<T, DemoError>) -> Result<Value, DemoError> {
    let data = result?;
    serde_json::to_value(data)
        .map_err(|e| DemoError::unexpected(format!("Failed to serialize route data: {e}")))
}

/// Run the loader of `route`
pub async fn run_loader(
    route: RouteId,
    demos: &Demos,
    path: &str,
    args: RouteArgs<'_>,
) -> Result<Value, DemoError> {
    match route {
        RouteId::Home => to_json(overview::home_loader().await),
        RouteId::DemosLayout => to_json(overview::layout_loader(path).await),
        RouteId::DemosIndex => to_json(overview::index_loader(args).await),
        RouteId::Loader => to_json(users::loader(demos, args).await),
        RouteId::Action => to_json(todos::loader(demos).await),
        RouteId::Client => to_json(repos::loader(demos, args).await),
        RouteId::Error => to_json(faults::loader(args).await),
        RouteId::RscActions => to_json(server_actions::loader(demos).await),
        RouteId::RscPromises => to_json(streaming::loader(demos).await),
        RouteId::NestedLayout => to_json(catalog::layout_loader(args).await),
        RouteId::NestedIndex => to_json(catalog::index_loader().await),
        RouteId::Category => to_json(catalog::category_loader(args).await),
        RouteId::Item => to_json(catalog::item_loader(args).await),
    }
}

/// Whether `route` accepts submissions
pub const fn has_action(route: RouteId) -> bool {
    matches!(
        route,
        RouteId::Action | RouteId::Client | RouteId::Error | RouteId::RscActions
    )
}

fn logged(route: RouteId, result: Result<Outcome, DemoError>) -> Result<Value, DemoError> {
    let outcome = result?;
    logger::log_mutation(route.as_str(), outcome.operation, outcome.applied);
    to_json(Ok(outcome))
}

/// Run the action of `route`; `None` when the route has no action
pub async fn run_action(
    route: RouteId,
    demos: &Demos,
    form: &FormData,
) -> Option<Result<Value, DemoError>> {
    let result = match route {
        RouteId::Action => logged(route, todos::action(demos, form).await),
        RouteId::Client => logged(route, repos::action(demos, form).await),
        RouteId::RscActions => logged(route, server_actions::action(demos, form).await),
        RouteId::Error => to_json(faults::action(form).await),
        _ => return None,
    };
    Some(result)
}
