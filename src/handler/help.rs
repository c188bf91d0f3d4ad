//! Help page module
//!
//! Usage pages derived from the route table. Rendered once at startup since
//! neither the table nor the site config change afterwards.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::{AppState, SiteConfig};
use crate::handler::router::RequestContext;
use crate::http::{self, is_browser, response::TEXT_HTML_UTF8, response::TEXT_PLAIN_UTF8};
use crate::routing::RouteTable;

/// Pre-rendered help documents
#[derive(Debug, Clone)]
pub struct HelpPages {
    pub plain: String,
    pub html: String,
}

impl HelpPages {
    pub fn render(site: &SiteConfig, routes: &RouteTable) -> Self {
        Self {
            plain: render_plain(site, routes),
            html: render_html(site, routes),
        }
    }
}

/// Serve HTML to browsers, plain text to everything else
pub fn serve_help(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    if is_browser(ctx.accept, ctx.user_agent) {
        http::build_help_response(state.help.html.clone(), TEXT_HTML_UTF8, ctx.is_head)
    } else {
        http::build_help_response(state.help.plain.clone(), TEXT_PLAIN_UTF8, ctx.is_head)
    }
}

fn render_plain(site: &SiteConfig, routes: &RouteTable) -> String {
    let mut out = format!("{} - {}\n\nUsage:\n\n", site.name, site.tagline);
    for route in routes.iter() {
        out.push_str(&format!(
            "  {}:\n    {}\n\n",
            route.title,
            route.usage(&site.public_url)
        ));
    }
    out.push_str(&format!("More info: {}\n", site.repo_url));
    out
}

fn render_html(site: &SiteConfig, routes: &RouteTable) -> String {
    let devices: String = routes
        .iter()
        .map(|route| {
            format!(
                r#"
  <div class="device">
    <h3>{}</h3>
    <pre><code>{}</code></pre>
  </div>
"#,
                escape_html(&route.title),
                escape_html(&route.usage(&site.public_url))
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{name}</title>
  <style>
    body {{
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      max-width: 600px;
      margin: 40px auto;
      padding: 20px;
      background: #1a1a2e;
      color: #eee;
    }}
    h1 {{ color: #00d4ff; }}
    code {{
      background: #16213e;
      padding: 2px 8px;
      border-radius: 4px;
      font-family: 'Fira Code', 'Consolas', monospace;
    }}
    pre {{
      background: #16213e;
      padding: 16px;
      border-radius: 8px;
      overflow-x: auto;
    }}
    a {{ color: #00d4ff; }}
    .device {{ margin: 24px 0; }}
    .device h3 {{ color: #fff; margin-bottom: 8px; }}
  </style>
</head>
<body>
  <h1>{name}</h1>
  <p>{tagline}</p>
{devices}
  <p>
    <a href="{repo}">View on GitHub</a>
  </p>
</body>
</html>"#,
        name = escape_html(&site.name),
        tagline = escape_html(&site.tagline),
        repo = escape_html(&site.repo_url),
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
