//! Content negotiation module
//!
//! Best-effort browser detection used to pick HTML or plain-text output.

/// Browsers accept `text/html` and carry `Mozilla` in their User-Agent.
///
/// CLI tools that spoof both headers are classified as browsers.
pub fn is_browser(accept: Option<&str>, user_agent: Option<&str>) -> bool {
    accept.unwrap_or_default().contains("text/html")
        && user_agent.unwrap_or_default().contains("Mozilla")
}
