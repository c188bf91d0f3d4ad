//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route matching, and dispatching.

use crate::config::AppState;
use crate::handler::{help, script};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{match_route, RouteMatch};
use crate::upstream::CacheStatus;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub accept: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let uri = req.uri();
    let headers = req.headers();

    logger::log_headers_count(headers.len(), state.config.logging.show_headers);

    let ctx = RequestContext {
        path: uri.path(),
        is_head: *method == Method::HEAD,
        accept: header_str(&req, "accept"),
        user_agent: header_str(&req, "user-agent"),
    };

    // 1. Check HTTP method, 2. dispatch
    let (mut response, cache_status) =
        match check_http_method(method, state.config.http.enable_cors) {
            Some(resp) => (resp, None),
            None => route_request(&ctx, &state).await,
        };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        let entry = access_entry(&req, peer_addr, &response, cache_status, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Dispatch by path: help, script, or 404
pub async fn route_request(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> (Response<Full<Bytes>>, Option<CacheStatus>) {
    match match_route(ctx.path, &state.routes) {
        RouteMatch::Help => (help::serve_help(ctx, state), None),
        RouteMatch::Script(route) => {
            let (response, cache_status) = script::serve_script(ctx, route, state).await;
            (response, Some(cache_status))
        }
        RouteMatch::NotFound => (
            http::build_404_response(
                format!("Not found. Try {}", state.routes.known_paths()),
                ctx.is_head,
            ),
            None,
        ),
    }
}

/// Access log record for a finished request
fn access_entry<B>(
    req: &Request<B>,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    cache_status: Option<CacheStatus>,
    started: Instant,
) -> AccessLogEntry {
    let uri = req.uri();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        uri.path().to_string(),
    );
    entry.query = uri.query().map(ToString::to_string);
    entry.http_version = http_version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_str(req, "referer").map(ToString::to_string);
    entry.user_agent = header_str(req, "user-agent").map(ToString::to_string);
    entry.cache_status = cache_status;
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn header_str<'a, B>(req: &'a Request<B>, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

const fn http_version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::response::DEVICE_HEADER;
    use crate::upstream::testing::StubFetcher;
    use crate::upstream::FetchOutcome;
    use http_body_util::BodyExt;

    const FIREFOX_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:131.0) Gecko/20100101 Firefox/131.0";
    const FIREFOX_ACCEPT: &str =
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
    const DECK_SCRIPT: &[u8] = b"#!/usr/bin/env bash\nset -euo pipefail\necho deck\n";

    fn state_with(outcome: FetchOutcome) -> (AppState, Arc<StubFetcher>) {
        let stub = Arc::new(StubFetcher::new(outcome));
        let state = AppState::with_fetcher(&Config::defaults().unwrap(), stub.clone());
        (state, stub)
    }

    fn curl(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            accept: Some("*/*"),
            user_agent: Some("curl/8.5.0"),
        }
    }

    fn browser(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            accept: Some(FIREFOX_ACCEPT),
            user_agent: Some(FIREFOX_UA),
        }
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        String::from_utf8(body_bytes(resp).await.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root_and_empty_path_serve_help() {
        let (state, stub) = state_with(FetchOutcome::UpstreamStatus(500));
        for path in ["/", ""] {
            let (resp, cache_status) = route_request(&curl(path), &state).await;
            assert_eq!(resp.status(), 200);
            assert_eq!(resp.headers()["content-type"], "text/plain; charset=utf-8");
            assert!(cache_status.is_none());
            let body = body_string(resp).await;
            assert!(body.contains("curl -fsSL https://bootible.dev/deck | bash"));
            assert!(body.contains("irm https://bootible.dev/rog | iex"));
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_browser_gets_html_help() {
        let (state, _) = state_with(FetchOutcome::UpstreamStatus(500));
        let (resp, _) = route_request(&browser("/"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        let body = body_string(resp).await;
        assert!(body.contains("curl -fsSL https://bootible.dev/deck | bash"));
        assert!(body.contains("https://github.com/gavinmcfall/bootible"));
    }

    #[tokio::test]
    async fn test_script_passthrough() {
        let (state, stub) = state_with(FetchOutcome::Fetched(Bytes::from_static(DECK_SCRIPT)));
        let (resp, cache_status) = route_request(&curl("/deck"), &state).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(cache_status, Some(CacheStatus::Miss));
        let headers = resp.headers();
        assert_eq!(headers["content-type"], "text/plain; charset=utf-8");
        assert_eq!(headers["cache-control"], "public, max-age=300");
        assert_eq!(headers[DEVICE_HEADER], "Steam Deck (SteamOS)");
        assert_eq!(body_bytes(resp).await, Bytes::from_static(DECK_SCRIPT));
        assert_eq!(
            stub.urls(),
            vec!["https://raw.githubusercontent.com/gavinmcfall/bootible/main/targets/deck.sh"]
        );
    }

    #[tokio::test]
    async fn test_script_ignores_client_type() {
        let (state, _) = state_with(FetchOutcome::Fetched(Bytes::from_static(b"Write-Host rog")));
        let (resp, _) = route_request(&browser("/rog"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/plain; charset=utf-8");
        assert_eq!(resp.headers()[DEVICE_HEADER], "ROG Ally X (Windows)");
    }

    #[tokio::test]
    async fn test_upstream_status_becomes_502() {
        let (state, _) = state_with(FetchOutcome::UpstreamStatus(404));
        let (resp, _) = route_request(&curl("/deck"), &state).await;
        assert_eq!(resp.status(), 502);
        assert_eq!(resp.headers()["content-type"], "text/plain");
        assert!(resp.headers().get("cache-control").is_none());
        assert!(resp.headers().get(DEVICE_HEADER).is_none());
        assert_eq!(body_string(resp).await, "Failed to fetch script: 404");
    }

    #[tokio::test]
    async fn test_transport_error_becomes_502() {
        let (state, _) = state_with(FetchOutcome::Transport("connection reset".to_string()));
        let (resp, _) = route_request(&curl("/rog"), &state).await;
        assert_eq!(resp.status(), 502);
        assert_eq!(body_string(resp).await, "Error fetching script: connection reset");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (state, stub) = state_with(FetchOutcome::UpstreamStatus(500));
        for path in ["/deck/", "/DECK", "/steam", "/targets/deck.sh"] {
            let (resp, _) = route_request(&browser(path), &state).await;
            assert_eq!(resp.status(), 404, "{path}");
            assert_eq!(resp.headers()["content-type"], "text/plain");
            let body = body_string(resp).await;
            assert!(body.contains("/rog") && body.contains("/deck"), "{body}");
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let (state, stub) = state_with(FetchOutcome::Fetched(Bytes::from_static(DECK_SCRIPT)));

        let (first, first_cache) = route_request(&curl("/deck"), &state).await;
        let (second, second_cache) = route_request(&curl("/deck"), &state).await;

        assert_eq!(first.status(), second.status());
        assert_eq!(first.headers()["content-type"], second.headers()["content-type"]);
        assert_eq!(body_bytes(first).await, body_bytes(second).await);
        assert_eq!(first_cache, Some(CacheStatus::Miss));
        assert_eq!(second_cache, Some(CacheStatus::Hit));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_head_script_has_no_body() {
        let (state, _) = state_with(FetchOutcome::Fetched(Bytes::from_static(DECK_SCRIPT)));
        let mut ctx = curl("/deck");
        ctx.is_head = true;
        let (resp, _) = route_request(&ctx, &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-length"], DECK_SCRIPT.len().to_string().as_str());
        assert!(body_bytes(resp).await.is_empty());
    }

    #[test]
    fn test_method_policy() {
        assert!(check_http_method(&Method::GET, false).is_none());
        assert!(check_http_method(&Method::HEAD, false).is_none());
        assert_eq!(check_http_method(&Method::OPTIONS, false).unwrap().status(), 204);
        assert_eq!(check_http_method(&Method::POST, false).unwrap().status(), 405);
        assert_eq!(check_http_method(&Method::DELETE, false).unwrap().status(), 405);
    }

    #[tokio::test]
    async fn test_access_entry_records_request() {
        let (state, _) = state_with(FetchOutcome::Fetched(Bytes::from_static(DECK_SCRIPT)));
        let req = Request::builder()
            .uri("/deck?v=2")
            .header("User-Agent", "curl/8.5.0")
            .header("Referer", "https://bootible.dev/")
            .body(())
            .unwrap();
        let (resp, cache_status) = route_request(&curl("/deck"), &state).await;

        let peer: SocketAddr = "10.0.0.7:51234".parse().unwrap();
        let entry = access_entry(&req, peer, &resp, cache_status, Instant::now());
        assert_eq!(entry.remote_addr, "10.0.0.7");
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.path, "/deck");
        assert_eq!(entry.query.as_deref(), Some("v=2"));
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body_bytes, DECK_SCRIPT.len() as u64);
        assert_eq!(entry.referer.as_deref(), Some("https://bootible.dev/"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.5.0"));
        assert_eq!(entry.cache_status, Some(CacheStatus::Miss));
    }

    #[test]
    fn test_header_str() {
        let req = Request::builder()
            .uri("/deck")
            .header("User-Agent", "curl/8.5.0")
            .body(())
            .unwrap();
        assert_eq!(header_str(&req, "user-agent"), Some("curl/8.5.0"));
        assert_eq!(header_str(&req, "accept"), None);
    }
}
