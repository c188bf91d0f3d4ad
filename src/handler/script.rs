//! Script proxy module
//!
//! Relays a route's script from upstream. Every fetch outcome maps to a response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, CachePolicy};
use crate::logger;
use crate::routing::ScriptRoute;
use crate::upstream::{CacheStatus, FetchOutcome};

/// Proxy `route`'s script
pub async fn serve_script(
    ctx: &RequestContext<'_>,
    route: &ScriptRoute,
    state: &AppState,
) -> (Response<Full<Bytes>>, CacheStatus) {
    let upstream = &state.config.upstream;
    let url = route.upstream_url(&upstream.base_url);
    let (outcome, cache_status) = state.scripts.load(&url).await;

    let response = match outcome {
        FetchOutcome::Fetched(body) => http::build_script_response(
            body,
            &route.label,
            CachePolicy::for_ttl(upstream.cache_ttl),
            ctx.is_head,
        ),
        FetchOutcome::UpstreamStatus(status) => {
            logger::log_upstream_status(&url, status);
            http::build_502_response(format!("Failed to fetch script: {status}"), ctx.is_head)
        }
        FetchOutcome::Transport(message) => {
            logger::log_upstream_error(&url, &message);
            http::build_502_response(format!("Error fetching script: {message}"), ctx.is_head)
        }
    };

    (response, cache_status)
}
