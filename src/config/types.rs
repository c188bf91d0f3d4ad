// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub upstream: UpstreamConfig,
    pub site: SiteConfig,
    /// Script routes, in the order they are advertised
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteEntry>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
}

/// Remote repository the scripts are fetched from
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UpstreamConfig {
    /// Raw-content base URL, without trailing slash
    pub base_url: String,
    /// Seconds a fetched script stays fresh (0 disables caching)
    pub cache_ttl: u32,
    /// Outbound request timeout in seconds
    pub timeout: u64,
    pub user_agent: String,
}

/// Text shown on the help page
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    pub name: String,
    pub tagline: String,
    /// Public origin used in the usage snippets, e.g. `https://bootible.dev`
    pub public_url: String,
    pub repo_url: String,
}

/// One proxied script
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Request path, matched exactly
    pub path: String,
    /// Path of the script relative to `upstream.base_url`
    pub script: String,
    /// Value of the device-label response header
    pub label: String,
    /// Heading used on the help page
    pub title: String,
    #[serde(default)]
    pub shell: Shell,
}

/// Shell the script is piped into
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Shell {
    #[default]
    Bash,
    Powershell,
}

impl Shell {
    /// One-liner that downloads `url` and runs it
    pub fn invocation(self, url: &str) -> String {
        match self {
            Self::Bash => format!("curl -fsSL {url} | bash"),
            Self::Powershell => format!("irm {url} | iex"),
        }
    }
}

pub fn default_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry {
            path: "/rog".to_string(),
            script: "/targets/ally.ps1".to_string(),
            label: "ROG Ally X (Windows)".to_string(),
            title: "ROG Ally X".to_string(),
            shell: Shell::Powershell,
        },
        RouteEntry {
            path: "/deck".to_string(),
            script: "/targets/deck.sh".to_string(),
            label: "Steam Deck (SteamOS)".to_string(),
            title: "Steam Deck".to_string(),
            shell: Shell::Bash,
        },
    ]
}
