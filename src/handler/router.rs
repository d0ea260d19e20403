//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! route matching, running loaders and actions, and the error boundary.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;

use super::dispatch;
use crate::config::AppState;
use crate::demos::{timestamp, Outcome, RouteArgs};
use crate::error::DemoError;
use crate::http::{self, FormData};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, MatchChain, Params, RouteId};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: FormData,
    pub is_head: bool,
}

/// One entry of a match document
#[derive(Debug, Serialize)]
struct RouteMatch<'a> {
    id: &'static str,
    params: &'a Params,
    data: Value,
}

/// Data of every matched route, outermost first
#[derive(Debug, Serialize)]
struct MatchDocument<'a> {
    path: &'a str,
    generated_at: String,
    matches: Vec<RouteMatch<'a>>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: hyper::body::Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let mut access_log = state
        .access_log_enabled()
        .then(|| AccessLogEntry::start(&req, peer_addr));

    let (mut response, route) = route_request(req, &state).await;
    http::decorate(
        &mut response,
        &state.config.http.server_name,
        state.config.http.enable_cors,
    );

    if let Some(entry) = access_log.as_mut() {
        entry.finish(&response, route.map(RouteId::as_str));
        logger::log_access(entry, &state.access_format);
    }

    Ok(response)
}

/// Check HTTP method and return a response for methods the router does not serve
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD | Method::POST => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(hyper::header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request; also reports the deepest matched route for the access log
async fn route_request<B>(
    req: Request<B>,
    state: &AppState,
) -> (Response<Full<Bytes>>, Option<RouteId>)
where
    B: hyper::body::Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    // 1. Method and body guards
    if let Some(resp) = check_http_method(req.method(), state.config.http.enable_cors) {
        return (resp, None);
    }
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return (resp, None);
    }

    let (parts, body) = req.into_parts();
    let ctx = RequestContext {
        path: parts.uri.path(),
        query: FormData::from_query(parts.uri.query()),
        is_head: parts.method == Method::HEAD,
    };

    // 2. Health check endpoints
    let health = &state.config.health;
    if health.enabled
        && parts.method != Method::POST
        && (ctx.path == health.liveness_path || ctx.path == health.readiness_path)
    {
        return (http::build_health_response("ok", ctx.is_head), None);
    }

    // 3. Route tree
    let Some(chain) = routing::match_path(ctx.path) else {
        let err = DemoError::not_found(format!("No route matches URL \"{}\"", ctx.path));
        logger::log_debug(&err.to_string());
        return (
            http::build_error_response(&err, None, false, ctx.is_head),
            None,
        );
    };
    let leaf = chain.leaf();

    let response = if parts.method == Method::POST {
        submit(&ctx, &chain, body, state).await
    } else {
        load(&ctx, &chain, state).await
    };
    (response, leaf)
}

/// Run every loader in the chain, outermost first; the first failure wins
async fn load(ctx: &RequestContext<'_>, chain: &MatchChain, state: &AppState) -> Response<Full<Bytes>> {
    let args = RouteArgs::new(&chain.params, &ctx.query);
    let mut matches = Vec::with_capacity(chain.routes.len());

    for &route in &chain.routes {
        match dispatch::run_loader(route, &state.demos, ctx.path, args).await {
            Ok(data) => matches.push(RouteMatch {
                id: route.as_str(),
                params: &chain.params,
                data,
            }),
            Err(err) => return boundary(route, &err, state, ctx.is_head),
        }
    }

    let document = MatchDocument {
        path: ctx.path,
        generated_at: timestamp(),
        matches,
    };
    http::json_response(StatusCode::OK, &document, ctx.is_head)
}

/// Run the action of the deepest matched route
async fn submit<B>(
    ctx: &RequestContext<'_>,
    chain: &MatchChain,
    body: B,
    state: &AppState,
) -> Response<Full<Bytes>>
where
    B: hyper::body::Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let Some(route) = chain.leaf().filter(|r| dispatch::has_action(*r)) else {
        logger::log_warning(&format!("No action for POST {}", ctx.path));
        return http::build_405_response();
    };

    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body over {limit} bytes"));
            return http::build_413_response();
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            let err = DemoError::Validation("Request body could not be read".to_string());
            return boundary(route, &err, state, false);
        }
    };

    let form = match FormData::parse(&bytes) {
        Ok(form) => form,
        Err(err) => return boundary(route, &err, state, false),
    };

    match dispatch::run_action(route, &state.demos, &form).await {
        Some(Ok(outcome)) => http::json_response(StatusCode::OK, &outcome, false),
        Some(Err(DemoError::UnknownOperation(tag))) => {
            logger::log_warning(&format!("{route}: unknown intent {tag:?}"));
            let outcome = Outcome::rejected("unknown", "Unknown action").with("intent", tag);
            http::json_response(StatusCode::BAD_REQUEST, &outcome, false)
        }
        Some(Err(err)) => boundary(route, &err, state, false),
        None => http::build_405_response(),
    }
}

/// Render a loader or action failure as the route's error boundary
fn boundary(
    route: RouteId,
    err: &DemoError,
    state: &AppState,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let status = err.status_code();
    logger::log_boundary_error(
        route.as_str(),
        status.as_u16(),
        &err.to_string(),
        err.is_expected(),
    );
    http::build_error_response(
        err,
        Some(route.as_str()),
        state.config.http.expose_error_traces,
        is_head,
    )
}
