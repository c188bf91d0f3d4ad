//! HTTP response building module
//!
//! Provides builders for various HTTP status code responses, decoupled from specific business logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::cache::CachePolicy;

/// Header carrying the proxied script's device label
pub const DEVICE_HEADER: &str = "X-Bootible-Device";

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML_UTF8: &str = "text/html; charset=utf-8";
/// Error bodies go out without a charset parameter
pub const TEXT_PLAIN: &str = "text/plain";

/// Body for GET, empty body for HEAD
fn body_for(data: Bytes, is_head: bool) -> Full<Bytes> {
    if is_head {
        Full::new(Bytes::new())
    } else {
        Full::new(data)
    }
}

/// Build 200 help response, HTML or plain text
pub fn build_help_response(content: String, content_type: &str, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(body_for(Bytes::from(content), is_head))
        .unwrap_or_else(|e| {
            log_build_error("help", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 200 response for a proxied script
pub fn build_script_response(
    data: Bytes,
    label: &str,
    cache: CachePolicy,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();

    Response::builder()
        .status(200)
        .header("Content-Type", TEXT_PLAIN_UTF8)
        .header("Content-Length", content_length)
        .header("Cache-Control", cache.to_header_value())
        .header(DEVICE_HEADER, label)
        .body(body_for(data, is_head))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 502 Bad Gateway response; never carries cache headers
pub fn build_502_response(message: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = message.len();

    Response::builder()
        .status(502)
        .header("Content-Type", TEXT_PLAIN)
        .header("Content-Length", content_length)
        .body(body_for(Bytes::from(message), is_head))
        .unwrap_or_else(|e| {
            log_build_error("502", &e);
            Response::new(Full::new(Bytes::from("502 Bad Gateway")))
        })
}

/// Build 404 Not Found response
pub fn build_404_response(message: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = message.len();

    Response::builder()
        .status(404)
        .header("Content-Type", TEXT_PLAIN)
        .header("Content-Length", content_length)
        .body(body_for(Bytes::from(message), is_head))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", TEXT_PLAIN)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
